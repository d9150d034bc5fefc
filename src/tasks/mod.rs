// Task model, task store and next-task resolution

pub mod model;
pub mod resolve;
pub mod store;

pub use model::{Task, TaskList, TaskPath};
pub use resolve::{next_task, plan_resolution, resolve, Resolution};
pub use store::{load_flat, load_tree, parse_flat, parse_tree};
