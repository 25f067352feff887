pub mod response;
pub mod string;
pub mod time;
pub mod markup;
pub mod mongo;
