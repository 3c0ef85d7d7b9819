use crate::models::{next_id, AppData, LoginResponse, RegisterRequest, User, UserView};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("this email is already in use")]
    EmailTaken,
    #[error("incorrect email or password")]
    InvalidCredentials,
}

pub fn register(data: &mut AppData, request: RegisterRequest) -> Result<UserView, AuthError> {
    let name = request.name.trim();
    let email = request.email.trim();
    if name.is_empty() {
        return Err(AuthError::MissingField("name"));
    }
    if email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if request.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if data.users.iter().any(|user| user.email == email) {
        return Err(AuthError::EmailTaken);
    }

    let user = User {
        id: next_id(&data.users, |user| user.id),
        name: name.to_string(),
        email: email.to_string(),
        password: request.password,
        user_type: request.user_type,
    };
    let view = UserView::from(&user);
    data.users.push(user);
    Ok(view)
}

pub fn login(data: &mut AppData, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
    let user = data
        .users
        .iter()
        .find(|user| user.email == email.trim() && user.password == password)
        .ok_or(AuthError::InvalidCredentials)?;
    let view = UserView::from(user);
    let token = Uuid::new_v4().to_string();
    data.sessions.insert(token.clone(), view.id);
    Ok(LoginResponse { token, user: view })
}

/// Idempotent: removing an unknown token is not an error.
pub fn logout(data: &mut AppData, token: &str) {
    data.sessions.remove(token);
}

pub fn session_user(data: &AppData, token: &str) -> Option<UserView> {
    let user_id = data.sessions.get(token)?;
    data.users
        .iter()
        .find(|user| user.id == *user_id)
        .map(UserView::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            user_type: UserType::Patient,
        }
    }

    #[test]
    fn register_login_session_round_trip() {
        let mut data = AppData::default();
        let created = register(&mut data, request("ana@example.com")).unwrap();
        assert_eq!(created.id, 1);

        let session = login(&mut data, "ana@example.com", "secret").unwrap();
        assert_eq!(session.user.email, "ana@example.com");

        let user = session_user(&data, &session.token).unwrap();
        assert_eq!(user.id, created.id);

        logout(&mut data, &session.token);
        assert!(session_user(&data, &session.token).is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut data = AppData::default();
        register(&mut data, request("ana@example.com")).unwrap();
        let err = register(&mut data, request("ana@example.com")).unwrap_err();
        assert_eq!(err, AuthError::EmailTaken);
        assert_eq!(data.users.len(), 1);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut data = AppData::default();
        register(&mut data, request("ana@example.com")).unwrap();
        let err = login(&mut data, "ana@example.com", "nope").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(data.sessions.is_empty());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut data = AppData::default();
        let mut blank = request("ana@example.com");
        blank.name = "  ".to_string();
        assert_eq!(
            register(&mut data, blank).unwrap_err(),
            AuthError::MissingField("name")
        );
    }

    #[test]
    fn user_ids_continue_from_the_maximum() {
        let mut data = AppData::default();
        register(&mut data, request("a@example.com")).unwrap();
        register(&mut data, request("b@example.com")).unwrap();
        data.users.retain(|user| user.id != 1);
        let third = register(&mut data, request("c@example.com")).unwrap();
        assert_eq!(third.id, 3);
    }
}
