//! User Errors

use salvo::http::StatusError;
use tracing::error;

use aroma_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("A user with this email already exists")
        }
        UsersServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        UsersServiceError::AdminUndeletable => {
            StatusError::forbidden().brief("Admin users cannot be deleted")
        }
        UsersServiceError::MissingRequiredData | UsersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        UsersServiceError::Hash(source) => {
            error!("password hashing failed: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("users storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
