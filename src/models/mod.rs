pub mod todo;
pub mod user;

pub use todo::{NewTodo, Todo, TodoChanges, TodoPriority, TodoStatus};
pub use user::{NewUser, PublicUser, User, UserChanges, UserProfile, UserWithTodos};
