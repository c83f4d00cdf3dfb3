//! Screens of the terminal front-end.

mod product_list;

pub use product_list::draw as draw_product_list;
