mod deploy;
mod doctor;
mod login;

pub use deploy::deploy;
pub use doctor::doctor;
pub use login::login;
