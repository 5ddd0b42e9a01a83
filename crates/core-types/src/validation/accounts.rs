use super::{ValidationErrors, MSG_REQUIRED};
use serde::Serialize;
use validator::ValidateEmail;

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_FIRST_NAME: &str = "nombre";
pub const FIELD_LAST_NAME: &str = "apellidos";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD1: &str = "password1";
pub const FIELD_PASSWORD2: &str = "password2";
pub const FIELD_PASSWORD: &str = "password";

pub const MAX_USERNAME_CHARS: usize = 150;
pub const MIN_PERSON_NAME_CHARS: usize = 2;
pub const MAX_PERSON_NAME_CHARS: usize = 25;
pub const MIN_PASSWORD_CHARS: usize = 8;

pub const MSG_EMAIL_TAKEN: &str = "El correo electrónico ya está registrado.";
pub const MSG_USERNAME_TAKEN: &str = "Este nombre de usuario ya está en uso.";
pub const MSG_FIRST_NAME_ALPHA: &str = "El nombre solo debe contener letras.";
pub const MSG_LAST_NAME_ALPHA: &str = "Los apellidos solo deben contener letras.";
pub const MSG_PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden.";

/// Raw values of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub username: String,
    #[serde(default, rename = "nombre")]
    pub first_name: String,
    #[serde(default, rename = "apellidos")]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// What the identity store already holds for the submitted username and e-mail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniquenessCheck {
    pub username_taken: bool,
    pub email_taken: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Values echoed back to a re-rendered registration form. Passwords are never echoed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationFormValues {
    pub username: String,
    pub nombre: String,
    pub apellidos: String,
    pub email: String,
}

impl From<&RegistrationInput> for RegistrationFormValues {
    fn from(input: &RegistrationInput) -> Self {
        Self {
            username: input.username.clone(),
            nombre: input.first_name.clone(),
            apellidos: input.last_name.clone(),
            email: input.email.clone(),
        }
    }
}

/// Raw values of the sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLogin {
    pub username: String,
    pub password: String,
}

/// Validates a registration.
///
/// Names must be purely alphabetic: a two-word surname is rejected.
pub fn validate_registration(
    input: &RegistrationInput,
    existing: UniquenessCheck,
) -> Result<ValidRegistration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = input.username.trim().to_string();
    if username.is_empty() {
        errors.add(FIELD_USERNAME, MSG_REQUIRED);
    } else if username.chars().count() > MAX_USERNAME_CHARS {
        errors.add(
            FIELD_USERNAME,
            format!(
                "Asegúrese de que este valor tenga como máximo {MAX_USERNAME_CHARS} caracteres."
            ),
        );
    } else if !username.chars().all(is_username_char) {
        errors.add(
            FIELD_USERNAME,
            "Introduzca un nombre de usuario válido. Este valor solo puede contener letras, números y los caracteres @/./+/-/_.",
        );
    } else if existing.username_taken {
        errors.add(FIELD_USERNAME, MSG_USERNAME_TAKEN);
    }

    let first_name = person_name(&mut errors, FIELD_FIRST_NAME, &input.first_name, MSG_FIRST_NAME_ALPHA);
    let last_name = person_name(&mut errors, FIELD_LAST_NAME, &input.last_name, MSG_LAST_NAME_ALPHA);

    let email = input.email.trim().to_string();
    if email.is_empty() {
        errors.add(FIELD_EMAIL, MSG_REQUIRED);
    } else if !email.validate_email() {
        errors.add(FIELD_EMAIL, "Introduzca una dirección de correo electrónico válida.");
    } else if existing.email_taken {
        errors.add(FIELD_EMAIL, MSG_EMAIL_TAKEN);
    }

    if input.password1.is_empty() {
        errors.add(FIELD_PASSWORD1, MSG_REQUIRED);
    }
    if input.password2.is_empty() {
        errors.add(FIELD_PASSWORD2, MSG_REQUIRED);
    } else if !input.password1.is_empty() {
        if input.password1.as_bytes() != input.password2.as_bytes() {
            errors.add(FIELD_PASSWORD2, MSG_PASSWORD_MISMATCH);
        } else {
            check_password_strength(&mut errors, &input.password2);
        }
    }

    errors.into_result(ValidRegistration {
        username,
        first_name,
        last_name,
        email,
        password: input.password1.clone(),
    })
}

/// Validates the sign-in form. Only presence is checked here; credentials are
/// verified by the identity store.
pub fn validate_login(input: &LoginInput) -> Result<ValidLogin, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let username = input.username.trim().to_string();
    if username.is_empty() {
        errors.add(FIELD_USERNAME, MSG_REQUIRED);
    }
    if input.password.is_empty() {
        errors.add(FIELD_PASSWORD, MSG_REQUIRED);
    }
    errors.into_result(ValidLogin {
        username,
        password: input.password.clone(),
    })
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn person_name(errors: &mut ValidationErrors, field: &str, raw: &str, alpha_msg: &str) -> String {
    let value = raw.trim().to_string();
    let len = value.chars().count();
    if value.is_empty() {
        errors.add(field, MSG_REQUIRED);
    } else if len < MIN_PERSON_NAME_CHARS {
        errors.add(
            field,
            format!("Asegúrese de que este valor tenga al menos {MIN_PERSON_NAME_CHARS} caracteres (tiene {len})."),
        );
    } else if len > MAX_PERSON_NAME_CHARS {
        errors.add(
            field,
            format!("Asegúrese de que este valor tenga como máximo {MAX_PERSON_NAME_CHARS} caracteres (tiene {len})."),
        );
    } else if !value.chars().all(char::is_alphabetic) {
        errors.add(field, alpha_msg);
    }
    value
}

fn check_password_strength(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add(
            FIELD_PASSWORD2,
            format!("Esta contraseña es demasiado corta. Debe contener al menos {MIN_PASSWORD_CHARS} caracteres."),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(FIELD_PASSWORD2, "Esta contraseña es completamente numérica.");
    }
}
