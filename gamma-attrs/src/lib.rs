mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use gamma_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of input", labels = ["add something here"], category = Syntax)]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | An array of texts for the labels that point to each span of the error.       |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
/// | `category`  | Optional `gamma_error::Category` variant; defaults to `Internal`.            |
///
/// `message`, `labels` and `help` accept expressions that evaluate to a [`String`] or `&str`. For
/// structs with named fields, the expressions are evaluated with the members of the struct in
/// scope, so they can be used in the expression (tuple structs are not supported).
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl gamma_error::ErrorKind for #name {
            #target
        }
    }.into()
}
