pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_password_reset, __path_register, get_me, login,
    password_reset, register,
};
