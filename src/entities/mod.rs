pub mod session_item;
