pub mod enums;
pub mod markup;
pub mod todo;
pub mod views;

pub use enums::{Appearance, ColorTheme, Status, UiMode};
pub use markup::{autolink_urls, open_tags, InlineTag};
pub use todo::{now_millis, Todo};
pub use views::{format_duration, format_start_time};
