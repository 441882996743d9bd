mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod sign_up;
pub use sign_up::SignUp;

mod shell;
pub use shell::Shell;
