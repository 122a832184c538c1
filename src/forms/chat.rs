use serde::Deserialize;
use serde_valid::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatCreateForm {
    #[validate(max_length = 255)]
    pub title: String,
}
