pub mod add;
pub mod get;
pub mod get_list;
