mod applications;
mod checkout;
mod helpers;
mod http_client;
mod overview;
mod routing;
mod users;
