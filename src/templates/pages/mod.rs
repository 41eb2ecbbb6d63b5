pub mod explorer;

pub use explorer::explorer_page;
