//! Web form: sidebar for credentials, main area for the generate action.

pub mod page;
pub mod routes;
pub mod server;
pub mod state;

pub use page::{render_page, PageView};
pub use server::{router, shutdown_signal, Server};
pub use state::AppState;
