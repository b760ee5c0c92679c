/*!
Procedural macros for swagdoc type reflection.

`#[derive(Reflect)]` implements `swagdoc::Reflect` for structs with named
fields and for enums whose variants carry no data.
*/

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    ext::IdentExt, meta::ParseNestedMeta, parse_macro_input, parse_quote, Attribute, Data,
    DataEnum, DeriveInput, Fields, Generics, LitStr,
};

/// Derive `swagdoc::Reflect`.
///
/// Container attributes: `#[swag(rename = "Name")]` for the definition name
/// and `#[swag(xml = "Name")]` for the XML element name.
///
/// Field attributes: `#[swag(json = "..", query = "..", form = "..",
/// xml = "..", swagger = "..")]` set the struct tags, `#[swag(embed)]` marks
/// a field whose members belong to the parent, `#[swag(skip)]` is `json = "-"`.
/// serde's `rename`, `rename_all`, `skip` and `flatten` are honoured when no
/// `swag` attribute says otherwise.
#[proc_macro_derive(Reflect, attributes(swag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate_reflect_impl(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn generate_reflect_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let container = ContainerAttrs::parse(&input.attrs)?;
    let type_name = container
        .rename
        .clone()
        .unwrap_or_else(|| input.ident.unraw().to_string());

    let body = match &input.data {
        Data::Struct(data) => generate_struct_body(&type_name, &container, &data.fields)?,
        Data::Enum(data) => generate_enum_body(&type_name, &container, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Reflect cannot be derived for union types",
            ));
        }
    };

    let name = &input.ident;
    let generics = add_reflect_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::swagdoc::Reflect for #name #ty_generics #where_clause {
            #body
        }
    })
}

fn add_reflect_bounds(mut generics: Generics) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::swagdoc::Reflect));
    }
    generics
}

fn generate_struct_body(
    type_name: &str,
    container: &ContainerAttrs,
    fields: &Fields,
) -> syn::Result<TokenStream2> {
    let named = match fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Reflect can only be derived for structs with named fields",
            ));
        }
    };

    let mut descriptors = Vec::new();
    let mut values = Vec::new();
    for field in named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let ident_str = ident.unraw().to_string();
        let ty = &field.ty;

        let mut tags = Vec::new();
        // an embedded field keeps flattening unless it is named explicitly
        let json = attrs
            .json
            .clone()
            .or_else(|| attrs.skip.then(|| "-".to_string()))
            .or_else(|| attrs.serde_rename.clone())
            .or_else(|| {
                if attrs.embed {
                    return None;
                }
                container
                    .rename_all
                    .as_deref()
                    .map(|rule| rename_field(rule, &ident_str))
            });
        for (key, value) in [
            ("json", json),
            ("query", attrs.query),
            ("form", attrs.form),
            ("xml", attrs.xml),
            ("swagger", attrs.swagger),
        ] {
            if let Some(value) = value {
                tags.push(quote! { (#key, #value) });
            }
        }
        let embedded = attrs.embed;

        descriptors.push(quote! {
            ::swagdoc::Field::new(
                #ident_str,
                ::swagdoc::Type::of::<#ty>(),
                &[#(#tags),*],
                #embedded,
            )
        });
        values.push(quote! { ::swagdoc::Reflect::reflect(&self.#ident) });
    }

    let xml = match &container.xml {
        Some(xml) => quote! { ::std::option::Option::Some(#xml) },
        None => quote! { ::std::option::Option::None },
    };

    Ok(quote! {
        fn type_info() -> ::swagdoc::TypeInfo {
            ::swagdoc::TypeInfo::structure::<Self>(
                #type_name,
                #xml,
                ::std::vec![#(#descriptors),*],
            )
        }

        fn reflect(&self) -> ::swagdoc::Value {
            ::swagdoc::Value::Struct(::std::vec![#(#values),*])
        }
    })
}

/// Unit-only enums are strings holding the variant name
fn generate_enum_body(
    type_name: &str,
    container: &ContainerAttrs,
    data: &DataEnum,
) -> syn::Result<TokenStream2> {
    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Reflect can only be derived for enums without variant data",
            ));
        }
        let attrs = FieldAttrs::parse(&variant.attrs)?;
        let ident = &variant.ident;
        let ident_str = ident.unraw().to_string();
        let name = attrs
            .json
            .or(attrs.serde_rename)
            .or_else(|| {
                container
                    .rename_all
                    .as_deref()
                    .map(|rule| rename_variant(rule, &ident_str))
            })
            .unwrap_or(ident_str);
        arms.push(quote! {
            Self::#ident => ::swagdoc::Value::String(::std::string::String::from(#name)),
        });
    }

    Ok(quote! {
        fn type_info() -> ::swagdoc::TypeInfo {
            ::swagdoc::TypeInfo::new::<Self>(#type_name, ::swagdoc::Kind::String)
        }

        fn reflect(&self) -> ::swagdoc::Value {
            match *self {
                #(#arms)*
            }
        }
    })
}

#[derive(Default)]
struct ContainerAttrs {
    rename: Option<String>,
    xml: Option<String>,
    rename_all: Option<String>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        let mut serde_rename = None;
        for attr in attrs {
            if attr.path().is_ident("swag") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        out.rename = Some(string_value(&meta)?);
                    } else if meta.path.is_ident("xml") {
                        out.xml = Some(string_value(&meta)?);
                    } else {
                        return Err(meta.error("unsupported swag container attribute"));
                    }
                    Ok(())
                })?;
            } else if attr.path().is_ident("serde") {
                // serde validates its own attributes
                let _ = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                        serde_rename = Some(string_value(&meta)?);
                    } else if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                        out.rename_all = Some(string_value(&meta)?);
                    } else {
                        skip_meta(&meta)?;
                    }
                    Ok(())
                });
            }
        }
        if out.rename.is_none() {
            out.rename = serde_rename;
        }
        Ok(out)
    }
}

#[derive(Default)]
struct FieldAttrs {
    json: Option<String>,
    query: Option<String>,
    form: Option<String>,
    xml: Option<String>,
    swagger: Option<String>,
    embed: bool,
    skip: bool,
    serde_rename: Option<String>,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if attr.path().is_ident("swag") {
                attr.parse_nested_meta(|meta| {
                    let slot = if meta.path.is_ident("json") {
                        &mut out.json
                    } else if meta.path.is_ident("query") {
                        &mut out.query
                    } else if meta.path.is_ident("form") {
                        &mut out.form
                    } else if meta.path.is_ident("xml") {
                        &mut out.xml
                    } else if meta.path.is_ident("swagger") {
                        &mut out.swagger
                    } else if meta.path.is_ident("embed") {
                        out.embed = true;
                        return Ok(());
                    } else if meta.path.is_ident("skip") {
                        out.json = Some("-".to_string());
                        return Ok(());
                    } else {
                        return Err(meta.error("unsupported swag field attribute"));
                    };
                    *slot = Some(string_value(&meta)?);
                    Ok(())
                })?;
            } else if attr.path().is_ident("serde") {
                let _ = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                        out.serde_rename = Some(string_value(&meta)?);
                    } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                        out.skip = true;
                    } else if meta.path.is_ident("flatten") {
                        out.embed = true;
                    } else {
                        skip_meta(&meta)?;
                    }
                    Ok(())
                });
            }
        }
        Ok(out)
    }
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// Consume an attribute entry this macro does not read
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

/// serde `rename_all` applied to a snake_case field name
fn rename_field(rule: &str, field: &str) -> String {
    match rule {
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal(field),
        "camelCase" => {
            let pascal = pascal(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => pascal,
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_ascii_uppercase(),
        _ => field.to_string(),
    }
}

/// serde `rename_all` applied to a PascalCase variant name
fn rename_variant(rule: &str, variant: &str) -> String {
    match rule {
        "lowercase" => variant.to_ascii_lowercase(),
        "UPPERCASE" => variant.to_ascii_uppercase(),
        "camelCase" => {
            let mut chars = variant.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        "snake_case" => snake(variant),
        "SCREAMING_SNAKE_CASE" => snake(variant).to_ascii_uppercase(),
        "kebab-case" => snake(variant).replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => snake(variant).replace('_', "-").to_ascii_uppercase(),
        _ => variant.to_string(),
    }
}

fn pascal(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn snake(pascal: &str) -> String {
    let mut out = String::new();
    for (i, c) in pascal.char_indices() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_field() {
        assert_eq!(rename_field("camelCase", "photo_urls"), "photoUrls");
        assert_eq!(rename_field("PascalCase", "ship_date"), "ShipDate");
        assert_eq!(rename_field("kebab-case", "user_status"), "user-status");
        assert_eq!(rename_field("SCREAMING_SNAKE_CASE", "id"), "ID");
        assert_eq!(rename_field("snake_case", "quantity"), "quantity");
    }

    #[test]
    fn test_rename_variant() {
        assert_eq!(rename_variant("lowercase", "Available"), "available");
        assert_eq!(rename_variant("snake_case", "NotFound"), "not_found");
        assert_eq!(rename_variant("camelCase", "NotFound"), "notFound");
        assert_eq!(rename_variant("SCREAMING-KEBAB-CASE", "NotFound"), "NOT-FOUND");
    }
}
