use derive_new::new;

#[derive(new)]
pub struct CreateUser {
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}
