mod cache;
mod profile;
