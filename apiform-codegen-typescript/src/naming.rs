use std::fmt::{self, Display};

use apiform_core::signature::{Affix, CallArgument, Signature, capitalize};
use itertools::Itertools;

/// A type alias that `types.ts` exports for one part of an endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CodegenTypeName<'a> {
    /// `GetUserParams`, `ListUsersQuery`, or `CreateUserBody`.
    Argument(&'a str, CallArgument),
    /// `GetUserResponse`.
    Response(&'a str),
}

impl<'a> CodegenTypeName<'a> {
    /// Returns the aliases for every part of an endpoint, in
    /// declaration order: arguments first, then the response.
    pub fn for_signature(sig: &Signature<'a>) -> impl Iterator<Item = Self> + use<'a> {
        let name = sig.name;
        sig.call_arguments()
            .into_iter()
            .map(move |arg| Self::Argument(name, arg))
            .chain(std::iter::once(Self::Response(name)))
    }

    /// The endpoint this alias belongs to.
    pub fn endpoint(self) -> &'a str {
        match self {
            Self::Argument(name, _) | Self::Response(name) => name,
        }
    }

    /// The `Extract*` helper in `types.ts` that computes this alias.
    pub fn extractor(self) -> &'static str {
        match self {
            Self::Argument(_, CallArgument::Params) => "ExtractParams",
            Self::Argument(_, CallArgument::Query) => "ExtractQuery",
            Self::Argument(_, CallArgument::Body) => "ExtractBody",
            Self::Response(_) => "ExtractResponse",
        }
    }
}

impl Display for CodegenTypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = capitalize(self.endpoint());
        match self {
            Self::Argument(_, arg) => write!(f, "{base}{}", capitalize(arg.name())),
            Self::Response(_) => write!(f, "{base}Response"),
        }
    }
}

/// Returns the typed parameters of a generated function that forwards
/// to an endpoint: `params: GetUserParams, query?: GetUserQuery`.
///
/// A trailing query is optional; a query followed by a body isn't,
/// because arguments are positional.
pub fn parameters(sig: &Signature<'_>) -> Vec<String> {
    let args = sig.call_arguments();
    args.iter()
        .enumerate()
        .map(|(index, &arg)| {
            let optional = arg == CallArgument::Query && index + 1 == args.len();
            format!(
                "{}{}: {}",
                arg.name(),
                if optional { "?" } else { "" },
                CodegenTypeName::Argument(sig.name, arg),
            )
        })
        .collect()
}

/// Returns the argument list that forwards a generated function's
/// parameters to the client: `params, query`.
pub fn arguments(sig: &Signature<'_>) -> String {
    sig.call_arguments()
        .into_iter()
        .map(CallArgument::name)
        .join(", ")
}

/// Returns the names of every alias that code for these endpoints
/// refers to.
pub fn type_imports<'a>(sigs: impl IntoIterator<Item = Signature<'a>>) -> Vec<String> {
    sigs.into_iter()
        .flat_map(|sig| CodegenTypeName::for_signature(&sig).collect_vec())
        .map(|name| name.to_string())
        .collect()
}

/// The name of the generated hook for an endpoint: `useGetUser`.
pub fn hook_name(sig: &Signature<'_>, prefix: &str) -> String {
    sig.identifier(Affix::Prefix(prefix))
}

/// The name of a generated server function: `createUserAction`.
pub fn suffixed_name(sig: &Signature<'_>, suffix: &str) -> String {
    sig.identifier(Affix::Suffix(suffix))
}
