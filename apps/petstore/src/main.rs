mod logging;
mod pet;
mod store;
mod user;

use anyhow::Context;
use axum::Router;
use clap::{Parser, ValueEnum};
use logging::LoggingConfig;
use swagdoc::{ApiRoot, Info, License, OAuth2Flow, SecurityIn, SwagResult, SwaggerRoot};
use std::collections::BTreeMap;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "petstore")]
#[command(about = "Swagger Petstore sample server")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "PETSTORE_ADDR", default_value = "0.0.0.0:1323")]
    addr: String,

    /// Print the assembled document and exit
    #[arg(long, value_enum)]
    dump: Option<DumpFormat>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DumpFormat {
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(format) = cli.dump {
        let doc = build_root()?.document()?;
        let text = match format {
            DumpFormat::Json => doc.to_json()?,
            DumpFormat::Yaml => doc.to_yaml()?,
        };
        println!("{}", text);
        return Ok(());
    }

    let config = if cli.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };
    logging::init_logging(&config).context("initializing logging")?;

    let app = build_root()?.into_router().layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("binding {}", cli.addr))?;
    info!(addr = %cli.addr, "petstore listening, docs at /doc");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_root() -> SwagResult<SwaggerRoot> {
    let info = Info::new("Swagger Petstore", "1.0.0")
        .with_description("This is a sample server Petstore server.")
        .with_terms_of_service("http://swagger.io/terms/")
        .with_license(License {
            name: "Apache 2.0".to_string(),
            url: "http://www.apache.org/licenses/LICENSE-2.0.html".to_string(),
        });
    let root = SwaggerRoot::new(Router::new(), "/doc", Some(info));

    let mut scopes = BTreeMap::new();
    scopes.insert("write:pets".to_string(), "modify pets in your account".to_string());
    scopes.insert("read:pets".to_string(), "read your pets".to_string());
    root.set_request_content_type(&["application/json", "application/xml"])
        .set_response_content_type(&["application/json", "application/xml"])
        .set_external_docs("Find out more about Swagger", "http://swagger.io")
        .add_security_oauth2(
            "petstore_auth",
            "",
            OAuth2Flow::Implicit,
            "http://petstore.swagger.io/oauth/dialog",
            "",
            scopes,
        )
        .add_security_api_key("api_key", "", SecurityIn::Header);

    pet::register(&root)?;
    store::register(&root)?;
    user::register(&root)?;
    Ok(root)
}
