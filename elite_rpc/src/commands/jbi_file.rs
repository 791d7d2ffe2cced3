use serde::{Deserialize, Serialize};

/// Names a JBI program stored on the controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JbiFile {
    pub filename: String,
}

impl JbiFile {
    pub fn new<T: Into<String>>(filename: T) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}
