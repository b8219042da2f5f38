mod create;
mod health;
mod links;
mod redirect;

pub use create::create_link_handler;
pub use health::health_handler;
pub use links::{
    delete_link_handler, list_links_handler, restore_link_handler, update_link_handler,
};
pub use redirect::redirect_handler;
