// Domain-level errors for auth workflows.
#[derive(Debug)]
pub enum AuthError {
    // Names of the request fields that were empty.
    BlankFields(Vec<&'static str>),
    InvalidCredentials,
    InvalidToken,
    TokenExpired,
    StorageFailure,
}
