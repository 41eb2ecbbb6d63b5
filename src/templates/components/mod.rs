pub mod detail_panel;
pub mod dropdown;
pub mod error;
pub mod map_panel;
pub mod property_list;
pub mod search_bar;

pub use detail_panel::detail_panel;
pub use dropdown::{recent_searches_dropdown, suggestions_dropdown};
pub use error::error_page;
pub use map_panel::map_panel;
pub use property_list::property_list;
pub use search_bar::search_bar;
