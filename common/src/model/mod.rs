pub mod block;
pub mod context;
pub mod copy;
pub mod legal;
pub mod placeholder;
pub mod render;
pub mod template;
