use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_quote, Data, DeriveInput, Fields, LitStr, Path};

enum DefaultConstructor {
    Custom(Path),
    Fields(Vec<String>),
    Unit,
}

pub(crate) struct DeriveObject {
    ident: Ident,
    krate: Path,
    id: Option<LitStr>,
    extends: Vec<Path>,
    constructors: Vec<Ident>,
    construct: DefaultConstructor,
}

impl TryFrom<DeriveInput> for DeriveObject {
    type Error = syn::Error;

    fn try_from(input: DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "Object cannot be derived for generic types",
            ));
        }

        let mut krate: Path = parse_quote!(::fabrik_core);
        let mut id = None;
        let mut extends = Vec::new();
        let mut constructors = Vec::new();
        let mut custom = None;
        for attr in input.attrs.iter().filter(|a| a.path().is_ident("object")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().is_empty() {
                        return Err(meta.error("id must be non-empty"));
                    }
                    id = Some(lit);
                } else if meta.path.is_ident("extends") {
                    meta.parse_nested_meta(|parent| {
                        extends.push(parent.path);
                        Ok(())
                    })?;
                } else if meta.path.is_ident("constructors") {
                    meta.parse_nested_meta(|name| match name.path.get_ident() {
                        Some(ident) => {
                            constructors.push(ident.clone());
                            Ok(())
                        }
                        None => Err(name.error("constructor names must be identifiers")),
                    })?;
                } else if meta.path.is_ident("construct") {
                    custom = Some(meta.value()?.parse::<Path>()?);
                } else if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    krate = lit.parse()?;
                } else {
                    return Err(meta.error("unsupported object attribute"));
                }
                Ok(())
            })?;
        }

        let construct = match custom {
            Some(path) => DefaultConstructor::Custom(path),
            None => match &input.data {
                Data::Struct(s) => match &s.fields {
                    Fields::Unit => DefaultConstructor::Unit,
                    Fields::Named(named) => DefaultConstructor::Fields(
                        named
                            .named
                            .iter()
                            .filter_map(|f| f.ident.as_ref())
                            .map(|i| i.unraw().to_string())
                            .collect(),
                    ),
                    Fields::Unnamed(_) => {
                        return Err(syn::Error::new_spanned(
                            &input.ident,
                            "tuple structs need #[object(construct = path)]",
                        ))
                    }
                },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "enums and unions need #[object(construct = path)]",
                    ))
                }
            },
        };

        Ok(DeriveObject {
            ident: input.ident,
            krate,
            id,
            extends,
            constructors,
            construct,
        })
    }
}

impl ToTokens for DeriveObject {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let DeriveObject {
            ident,
            krate,
            id,
            extends,
            constructors,
            construct,
        } = self;

        let type_id = match id {
            Some(id) => quote! { ::core::option::Option::Some(#id) },
            None => quote! { ::core::option::Option::None },
        };

        let construct = match construct {
            DefaultConstructor::Custom(path) => quote! { #path(args) },
            DefaultConstructor::Fields(fields) => quote! {
                args.deserialize::<Self>(&[#(#fields),*]).map_err(::core::convert::Into::into)
            },
            DefaultConstructor::Unit => quote! {
                args.expect_empty()?;
                ::core::result::Result::Ok(#ident)
            },
        };

        let names = constructors.iter().map(|c| c.to_string());

        tokens.extend(quote! {
            impl #krate::Object for #ident {
                fn type_key(&self) -> #krate::TypeKey {
                    #krate::TypeKey::of::<Self>()
                }

                fn supertypes(&self) -> ::std::vec::Vec<#krate::TypeKey> {
                    <Self as #krate::Class>::ancestors()
                }
            }

            impl #krate::Class for #ident {
                const TYPE_ID: ::core::option::Option<&'static str> = #type_id;

                #[allow(unused_mut)]
                fn ancestors() -> ::std::vec::Vec<#krate::TypeKey> {
                    let mut ancestors: ::std::vec::Vec<#krate::TypeKey> = ::std::vec::Vec::new();
                    #(
                        for key in ::std::iter::once(#krate::TypeKey::of::<#extends>())
                            .chain(<#extends as #krate::Class>::ancestors())
                        {
                            if !ancestors.contains(&key) {
                                ancestors.push(key);
                            }
                        }
                    )*
                    ancestors
                }

                fn construct(
                    args: #krate::Args,
                ) -> ::core::result::Result<Self, #krate::BoxError> {
                    #construct
                }

                fn constructors() -> ::std::vec::Vec<(&'static str, #krate::ConstructorFn<Self>)> {
                    ::std::vec![#((#names, Self::#constructors as #krate::ConstructorFn<Self>)),*]
                }
            }
        })
    }
}
