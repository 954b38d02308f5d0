pub mod bcrypt_utils;
pub mod jwt_utils;
