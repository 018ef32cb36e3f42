use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Variant};

/// What the expansion needs to know about one enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    /// Only `source` + `context`: the variant can be built from the source alone.
    source_only: bool,
    cfgs: Vec<&'a Attribute>,
}

pub fn expand(input: DeriveInput) -> TokenStream {
    match expand_enum(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand_enum(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "ent_error can only be applied to enums"));
    };

    let variants = data.variants.iter().map(inspect).collect::<syn::Result<Vec<_>>>()?;
    for variant in &variants {
        if variant.source.is_some() && !variant.has_context {
            return Err(syn::Error::new_spanned(
                variant.ident,
                "ent_error variants with a source need `context: Option<Cow<'static, str>>`",
            ));
        }
    }

    let name = &input.ident;
    let ext = format_ident!("{}Ext", name);
    let derives = missing_derives(&input.attrs);
    let context_trait = context_trait(name, &ext, &variants);
    let source_impls = variants
        .iter()
        .filter(|v| v.ident != "Internal" && v.source_only)
        .filter_map(|v| source_impl(name, &ext, v));
    let internal_impls =
        variants.iter().find(|v| v.ident == "Internal").map(|v| internal_impl(name, v));

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#source_impls)*
        #internal_impls

        #[allow(dead_code, clippy::ref_option)]
        fn format_context(
            context: &::std::option::Option<::std::borrow::Cow<'static, str>>,
        ) -> ::std::borrow::Cow<'static, str> {
            match context {
                Some(c) => ::std::borrow::Cow::Owned(format!(" ({c})")),
                None => ::std::borrow::Cow::Borrowed(""),
            }
        }
    })
}

fn inspect(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "ent_error needs named fields so source and context can be wired",
        ));
    };

    let has_context = context_field(fields)?.is_some();
    let source = fields.named.iter().find(|f| is_source(f));

    Ok(ErrorVariant {
        ident: &variant.ident,
        source,
        has_context,
        source_only: source.is_some() && has_context && fields.named.len() == 2,
        cfgs: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).collect(),
    })
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };
    if is_optional_cow(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|i| i == "source")
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

fn missing_derives(attrs: &[Attribute]) -> TokenStream {
    let mut has_debug = false;
    let mut has_error = false;

    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            match meta.path.segments.last().map(|s| s.ident.to_string()).as_deref() {
                Some("Debug") => has_debug = true,
                Some("Error") => has_error = true,
                _ => {},
            }
            Ok(())
        });
    }

    let debug = (!has_debug).then(|| quote! { Debug });
    let error = (!has_error).then(|| quote! { ::thiserror::Error });
    match (debug, error) {
        (None, None) => quote! {},
        (debug, error) => {
            let list = debug.into_iter().chain(error);
            quote! { #[derive(#(#list),*)] }
        },
    }
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfgs = &v.cfgs;
        let ident = v.ident;
        quote! { #(#cfgs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        /// Attaches human-readable context to a failed result.
        pub trait #ext<T> {
            fn context(
                self,
                context: impl Into<::std::borrow::Cow<'static, str>>,
            ) -> ::std::result::Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for ::std::result::Result<T, #name> {
            #[inline]
            #[allow(unreachable_patterns, unused_variables)]
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #(#arms)*
                        _ => {},
                    }
                    err
                })
            }
        }
    }
}

fn source_impl(name: &Ident, ext: &Ident, variant: &ErrorVariant<'_>) -> Option<TokenStream> {
    let field = variant.source?;
    let field_ident = field.ident.as_ref()?;
    let ty = &field.ty;
    let ident = variant.ident;
    let cfgs = &variant.cfgs;

    Some(quote! {
        #(#cfgs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(source: #ty) -> Self {
                Self::#ident { #field_ident: source, context: None }
            }
        }

        #(#cfgs)*
        #[automatically_derived]
        impl<T> #ext<T> for ::std::result::Result<T, #ty> {
            #[inline]
            fn context(
                self,
                context: impl Into<::std::borrow::Cow<'static, str>>,
            ) -> ::std::result::Result<T, #name> {
                self.map_err(|source| #name::#ident { #field_ident: source, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impl(name: &Ident, variant: &ErrorVariant<'_>) -> TokenStream {
    let cfgs = &variant.cfgs;

    quote! {
        #(#cfgs)*
        #[automatically_derived]
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfgs)*
        #[automatically_derived]
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn is_optional_cow(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let lifetime_ok = matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_ok = matches!(
        args.next(),
        Some(syn::GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );
    lifetime_ok && str_ok
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
