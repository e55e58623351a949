pub mod donation_handler;

pub use donation_handler::{
    __path_close_donation, __path_create_donation, __path_delete_donation, __path_get_donation,
    __path_list_donations, __path_reserve_donation, __path_update_donation, close_donation,
    create_donation, delete_donation, get_donation, list_donations, reserve_donation,
    update_donation,
};
