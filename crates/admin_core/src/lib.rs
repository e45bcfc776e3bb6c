pub mod api;
pub mod catalog;
pub mod console;
pub mod error;
pub mod form;
pub mod pagination;
pub mod session;
pub mod token_store;

pub use api::{CatalogApi, HttpCatalogApi};
pub use catalog::{CatalogController, Confirm, FetchOutcome, MutationReceipt, RemoveOutcome};
pub use console::AdminConsole;
pub use error::{ApiError, AuthError, FetchError, ProductAction, RemoteError, SubmitError, ValidationError};
pub use form::{DraftField, FormMode, ProductDraft, ProductForm, MAX_IMAGE_SLOTS};
pub use pagination::{PageLink, PageWindow, PagerView, PAGES_PER_GROUP};
pub use session::{LoginForm, Session, SessionController};
pub use token_store::{DurableTokenStore, MemoryTokenStore, TokenStore, DEFAULT_TOKEN_ENTRY};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
