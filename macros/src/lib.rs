//! Derive macros for the storefront event bus
//!
//! # Available Macros
//!
//! - `#[derive(BusEvent)]` - Names each variant of an event enum and tags it
//!   as an intent or a change
//!
//! # Example
//!
//! ```ignore
//! use storefront_core::BusEvent;
//!
//! #[derive(BusEvent, Clone, Debug)]
//! enum UiEvent {
//!     #[intent("item:add")]
//!     ItemAdded { id: String },
//!
//!     #[change("count-changed")]
//!     CountChanged { count: usize },
//! }
//!
//! // Generated:
//! assert_eq!(UiEvent::CountChanged { count: 1 }.name(), "count-changed");
//! assert!(UiEvent::ItemAdded { id: "a".into() }.is_intent());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Which side of the bus a variant belongs to
#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Intent,
    Change,
}

/// Derive macro for bus event enums
///
/// Implements `storefront_core::event_bus::BusEvent` and generates:
/// - `name()` (through the trait) - The variant's event name
/// - `is_intent()` - Returns true if the variant is a user intent
/// - `is_change()` - Returns true if the variant reports a state change
///
/// # Attributes
///
/// - `#[intent("name")]` - Mark a variant as an intent published by a view
/// - `#[change("name")]` - Mark a variant as a change emitted by the state
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has neither attribute, or both
/// - An attribute's argument is not a non-empty string literal
#[proc_macro_derive(BusEvent, attributes(intent, change))]
pub fn derive_bus_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(BusEvent)] can only be used on enums",
        ));
    };

    let mut name_arms = Vec::new();
    let mut intent_arms = Vec::new();
    let mut change_arms = Vec::new();

    for variant in &data_enum.variants {
        let (class, event_name) = classify(variant)?;
        let pattern = variant_pattern(variant);

        name_arms.push(quote! { #pattern => #event_name, });
        match class {
            Class::Intent => intent_arms.push(quote! { #pattern => true, }),
            Class::Change => change_arms.push(quote! { #pattern => true, }),
        }
    }

    Ok(quote! {
        impl #impl_generics ::storefront_core::event_bus::BusEvent for #name #ty_generics #where_clause {
            fn name(&self) -> &str {
                match self {
                    #(#name_arms)*
                }
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns true if this event is a user intent
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this event reports a state change
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_change(&self) -> bool {
                match self {
                    #(#change_arms)*
                    _ => false,
                }
            }
        }
    })
}

/// Reads the variant's `#[intent]` / `#[change]` attribute
fn classify(variant: &Variant) -> syn::Result<(Class, LitStr)> {
    let intent = find_attribute(&variant.attrs, "intent");
    let change = find_attribute(&variant.attrs, "change");

    let (class, attr) = match (intent, change) {
        (Some(attr), None) => (Class::Intent, attr),
        (None, Some(attr)) => (Class::Change, attr),
        (Some(_), Some(_)) => {
            return Err(syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[change]",
            ));
        }
        (None, None) => {
            return Err(syn::Error::new_spanned(
                variant,
                "Variant needs #[intent(\"name\")] or #[change(\"name\")]",
            ));
        }
    };

    let event_name: LitStr = attr.parse_args()?;
    if event_name.value().is_empty() {
        return Err(syn::Error::new_spanned(event_name, "Event name cannot be empty"));
    }
    Ok((class, event_name))
}

fn variant_pattern(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}
