mod client;
mod domain;
mod session;
