//! Screen implementations. Each screen is a top-level Component.

pub mod dashboard;
pub mod login;
pub mod registrations;
pub mod users;
pub mod vehicles;

use parkdesk_core::Controller;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar plus the login form.
pub fn create_screens(controller: &Controller) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenId::Registrations,
            Box::new(registrations::RegistrationsScreen::new()),
        ),
        (ScreenId::Users, Box::new(users::UsersScreen::new())),
        (ScreenId::Vehicles, Box::new(vehicles::VehiclesScreen::new())),
        (
            ScreenId::Login,
            Box::new(login::LoginScreen::new(controller.clone())),
        ),
    ]
}
