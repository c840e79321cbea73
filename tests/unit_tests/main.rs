mod application;
mod infrastructure;
