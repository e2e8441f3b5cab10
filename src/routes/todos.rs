use crate::{
    auth::CurrentUser,
    db::DbSession,
    error::AppError,
    extract::Validated,
    models::{Todo, TodoIdPath, TodoRequest},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;

const TODO_COLUMNS: &str = "id, title, description, priority, complete";

fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Who to credit in the log. Anonymous unless the request carried a valid token.
fn actor(user: &Option<CurrentUser>) -> &str {
    user.as_ref().map_or("anonymous", |user| user.username.as_str())
}

/// Retrieves every todo.
///
/// Todos are not owned by users, so the list is the same for every caller.
/// Ordered by id.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Todo` objects.
/// - `500 Internal Server Error`: the store failed.
#[get("")]
pub async fn read_all(mut session: DbSession) -> Result<impl Responder, AppError> {
    let todos = sqlx::query_as::<_, Todo>(&format!("SELECT {} FROM todos ORDER BY id", TODO_COLUMNS))
        .fetch_all(session.conn())
        .await?;

    Ok(HttpResponse::Ok().json(todos))
}

/// Retrieves a specific todo by its id.
///
/// ## Path Parameters:
/// - `todo_id`: a positive integer.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `404 Not Found`: no todo has that id.
/// - `422 Unprocessable Entity`: `todo_id` is below 1.
#[get("/{todo_id}")]
pub async fn read_todo(
    mut session: DbSession,
    path: Validated<web::Path<TodoIdPath>>,
) -> Result<impl Responder, AppError> {
    let todo = sqlx::query_as::<_, Todo>(&format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS))
        .bind(path.todo_id)
        .fetch_optional(session.conn())
        .await?
        .ok_or_else(todo_not_found)?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Creates a new todo.
///
/// ## Request Body:
/// A JSON object matching `TodoRequest`: `title` (3+ chars), `description`
/// (3 to 100 chars), `priority` (1 to 5) and `complete`.
///
/// ## Responses:
/// - `201 Created`: the stored `Todo`, including its new id.
/// - `422 Unprocessable Entity`: the body is not a `TodoRequest`, or a field
///   breaks its constraint.
#[post("")]
pub async fn create_todo(
    mut session: DbSession,
    user: Option<CurrentUser>,
    todo_request: Validated<web::Json<TodoRequest>>,
) -> Result<impl Responder, AppError> {
    let request = todo_request.into_inner().into_inner();

    let todo = sqlx::query_as::<_, Todo>(&format!(
        "INSERT INTO todos (title, description, priority, complete) VALUES (?, ?, ?, ?) RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(&request.title)
    .bind(&request.description)
    .bind(request.priority)
    .bind(request.complete)
    .fetch_one(session.conn())
    .await?;

    info!("created todo {} for {}", todo.id, actor(&user));
    Ok(HttpResponse::Created().json(todo))
}

/// Overwrites every field of an existing todo.
///
/// ## Responses:
/// - `204 No Content`: updated.
/// - `404 Not Found`: no todo has that id.
/// - `422 Unprocessable Entity`: the id or a body field breaks its constraint.
#[put("/{todo_id}")]
pub async fn update_todo(
    mut session: DbSession,
    user: Option<CurrentUser>,
    path: Validated<web::Path<TodoIdPath>>,
    todo_request: Validated<web::Json<TodoRequest>>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query(
        "UPDATE todos SET title = ?, description = ?, priority = ?, complete = ? WHERE id = ?",
    )
    .bind(&todo_request.title)
    .bind(&todo_request.description)
    .bind(todo_request.priority)
    .bind(todo_request.complete)
    .bind(path.todo_id)
    .execute(session.conn())
    .await?;

    if result.rows_affected() == 0 {
        return Err(todo_not_found());
    }

    info!("updated todo {} for {}", path.todo_id, actor(&user));
    Ok(HttpResponse::NoContent().finish())
}

/// Deletes a todo by its id.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no todo has that id.
#[delete("/{todo_id}")]
pub async fn delete_todo(
    mut session: DbSession,
    user: Option<CurrentUser>,
    path: Validated<web::Path<TodoIdPath>>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(path.todo_id)
        .execute(session.conn())
        .await?;

    if result.rows_affected() == 0 {
        return Err(todo_not_found());
    }

    info!("deleted todo {} for {}", path.todo_id, actor(&user));
    Ok(HttpResponse::NoContent().finish())
}
