use crate::{
    auth::{LoginForm, PasswordHasher, Token, TokenKeys},
    db::DbSession,
    error::AppError,
    extract::Validated,
    models::{CreateUserRequest, User, UserResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use log::{info, warn};

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, hashed_password, is_active, role";

fn username_taken() -> AppError {
    AppError::BadRequest("Username already registered".into())
}

/// Register a new user
///
/// Hashes the password and stores an active user row. Usernames are unique:
/// a second registration under the same name is refused with 400.
///
/// ## Responses:
/// - `201 Created`: the public view of the new user.
/// - `400 Bad Request`: the username is taken.
/// - `422 Unprocessable Entity`: the body is malformed or a field breaks its constraint.
#[post("/")]
pub async fn create_user(
    mut session: DbSession,
    hasher: web::Data<PasswordHasher>,
    create_user_request: Validated<web::Json<CreateUserRequest>>,
) -> Result<impl Responder, AppError> {
    let request = create_user_request.into_inner().into_inner();

    let existing_user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(&request.username)
        .fetch_optional(session.conn())
        .await?;

    if existing_user.is_some() {
        return Err(username_taken());
    }

    let hashed_password = hasher.hash(&request.password)?;
    let user = insert_user(&mut session, &request, &hashed_password).await?;

    info!("registered user {} (id {})", user.username, user.id);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login user
///
/// Takes a form-encoded `username` and `password` and answers with a bearer
/// token that expires after the configured TTL.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "token_type": "bearer"}`.
/// - `422 Unprocessable Entity`: the form is missing a field.
/// - `401 Unauthorized`: unknown username or wrong password.
#[post("/token")]
pub async fn login_for_access_token(
    mut session: DbSession,
    hasher: web::Data<PasswordHasher>,
    keys: web::Data<TokenKeys>,
    form_data: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = authenticate_user(&mut session, &hasher, &form_data.username, &form_data.password).await?;

    let access_token = keys.create_access_token(&user.username, user.id)?;
    info!("issued access token for user {}", user.id);

    Ok(HttpResponse::Ok().json(Token::bearer(access_token)))
}

/// Stores an active user. A registration that lost the race for its username
/// still gets the 400 rather than the raw constraint failure.
async fn insert_user(
    session: &mut DbSession,
    request: &CreateUserRequest,
    hashed_password: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role) \
         VALUES (?, ?, ?, ?, ?, 1, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&request.email)
    .bind(&request.username)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(hashed_password)
    .bind(&request.role)
    .fetch_one(session.conn())
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!("registration for {:?} hit the unique constraint", request.username);
            username_taken()
        }
        other => AppError::from(other),
    })
}

/// Looks the user up by username and checks the password against the stored
/// hash. Both failure modes give the same answer.
async fn authenticate_user(
    session: &mut DbSession,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(session.conn())
    .await?;

    match user {
        Some(user) if hasher.verify(password, &user.hashed_password) => Ok(user),
        Some(_) => {
            warn!("failed login for {:?}: wrong password", username);
            Err(AppError::Unauthorized("Could not validate user.".into()))
        }
        None => {
            warn!("failed login for {:?}: unknown user", username);
            Err(AppError::Unauthorized("Could not validate user.".into()))
        }
    }
}
