// Resource services: one `impl Client` block per backend resource.

mod auth;
mod directory;
mod face;
mod parking;
mod registrations;
mod users;
mod vehicles;
