mod common;
mod photos;
mod votes;
