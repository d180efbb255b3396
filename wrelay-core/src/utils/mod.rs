pub mod bonus;
