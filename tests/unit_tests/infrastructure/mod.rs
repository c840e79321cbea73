mod audio;
mod observability;
