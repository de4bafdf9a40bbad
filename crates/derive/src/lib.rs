extern crate proc_macro;

mod derive_object;

use derive_object::DeriveObject;
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{parse_macro_input, DeriveInput};

/// Implements `Object` and `Class` for a struct or enum.
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Deserialize, Object)]
/// #[object(id = "lamb", extends(Sheep), constructors(newborn))]
/// struct Lamb {
///     wool: String,
/// }
/// ```
///
/// - `id`: identifier used when registering without an explicit one
/// - `extends(P, ...)`: parents accepted by allowed-type checks, along with their own ancestors
/// - `constructors(name, ...)`: named constructors, each `fn name(Args) -> Result<Self, BoxError>`
/// - `construct = path`: default constructor; otherwise named fields are deserialized from the
///   arguments in declaration order and unit structs take no arguments
/// - `crate = "path"`: where `fabrik_core` is found, `::fabrik_core` by default
#[proc_macro_derive(Object, attributes(object))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match DeriveObject::try_from(input) {
        Ok(derived) => derived.into_token_stream().into(),
        Err(e) => e.to_compile_error().into(),
    }
}
