//! Route handlers.
//!
//! Each handler loads the caller's session, works on it through the
//! `todo_core` API and saves it before responding. Successful form posts
//! redirect with a flash message; rejected titles re-render the originating
//! view with a 422.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use todo_core::{FlashKind, ListId, TodoId};

use crate::{
    error::AppError,
    session::CurrentSession,
    views::{ListForm, ListFormView, ListView, ListsView, TodoForm},
    AppState,
};

fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("unresolvable id {raw:?}")))
}

fn list_path(id: ListId) -> String {
    format!("/lists/{id}")
}

pub async fn root() -> Redirect {
    Redirect::to("/lists")
}

pub async fn lists(
    State(state): State<AppState>,
    mut session: CurrentSession,
) -> Result<Json<ListsView>, AppError> {
    let flash = session.data.take_flash();
    let view = ListsView::render(&session.data, flash);
    session.save(&state.sessions).await?;
    Ok(Json(view))
}

pub async fn new_list(
    State(state): State<AppState>,
    mut session: CurrentSession,
) -> Result<Json<ListFormView>, AppError> {
    let flash = session.data.take_flash();
    session.save(&state.sessions).await?;
    Ok(Json(ListFormView::new_list(String::new(), Vec::new(), flash)))
}

pub async fn create_list(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    match session.data.validate_new_list_title(&form.todo_list_title) {
        Ok(title) => {
            let id = session.data.create_list(title)?;
            session
                .data
                .flash(FlashKind::Success, "The todo list has been created.");
            session.save(&state.sessions).await?;
            tracing::info!(list_id = id, "todo list created");
            Ok(Redirect::to("/lists").into_response())
        }
        Err(errors) => {
            let flash = session.data.take_flash();
            session.save(&state.sessions).await?;
            let view = ListFormView::new_list(form.todo_list_title, errors.into_messages(), flash);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
    }
}

pub async fn show_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
) -> Result<Json<ListView>, AppError> {
    let id = parse_id(&id)?;
    let flash = session.data.take_flash();
    let view = ListView::render(session.data.find_list(id)?, flash);
    session.save(&state.sessions).await?;
    Ok(Json(view))
}

pub async fn edit_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
) -> Result<Json<ListFormView>, AppError> {
    let id = parse_id(&id)?;
    let title = session.data.find_list(id)?.title().to_string();
    let flash = session.data.take_flash();
    session.save(&state.sessions).await?;
    Ok(Json(ListFormView::edit_list(id, title, Vec::new(), flash)))
}

pub async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    session.data.find_list(id)?;

    match session.data.validate_list_rename(id, &form.todo_list_title) {
        Ok(title) => {
            session.data.find_list_mut(id)?.set_title(title);
            session.data.flash(FlashKind::Success, "Todo list updated.");
            session.save(&state.sessions).await?;
            Ok(Redirect::to(&list_path(id)).into_response())
        }
        Err(errors) => {
            let flash = session.data.take_flash();
            session.save(&state.sessions).await?;
            let view =
                ListFormView::edit_list(id, form.todo_list_title, errors.into_messages(), flash);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
    }
}

pub async fn destroy_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    let removed = session.data.remove_list(id)?;
    session.data.flash(FlashKind::Success, "Todo list deleted.");
    session.save(&state.sessions).await?;
    tracing::info!(list_id = id, todos = removed.size(), "todo list deleted");
    Ok(Redirect::to("/lists"))
}

pub async fn complete_all(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    session.data.find_list_mut(id)?.mark_all_done();
    session
        .data
        .flash(FlashKind::Success, "All todos have been marked as done.");
    session.save(&state.sessions).await?;
    Ok(Redirect::to(&list_path(id)))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut session: CurrentSession,
    Form(form): Form<TodoForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    session.data.find_list(id)?;

    match session.data.validate_todo_title(&form.todo_title) {
        Ok(title) => {
            let todo_id = session.data.find_list_mut(id)?.create_todo(title)?.id();
            session
                .data
                .flash(FlashKind::Success, "The todo has been created.");
            session.save(&state.sessions).await?;
            tracing::debug!(list_id = id, todo_id, "todo created");
            Ok(Redirect::to(&list_path(id)).into_response())
        }
        Err(errors) => {
            let flash = session.data.take_flash();
            let view = ListView::render(session.data.find_list(id)?, flash)
                .with_rejected_todo(form.todo_title, errors.into_messages());
            session.save(&state.sessions).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response())
        }
    }
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(String, String)>,
    mut session: CurrentSession,
) -> Result<Redirect, AppError> {
    let list_id = parse_id(&list_id)?;
    let todo_id: TodoId = parse_id(&todo_id)?;
    let outcome = session.data.find_list_mut(list_id)?.toggle_todo(todo_id)?;
    if outcome.done {
        let message = format!("\"{}\" marked done.", outcome.title);
        session.data.flash(FlashKind::Success, message);
    } else {
        let message = format!("\"{}\" marked as NOT done!", outcome.title);
        session.data.flash(FlashKind::Info, message);
    }
    session.save(&state.sessions).await?;
    Ok(Redirect::to(&list_path(list_id)))
}

pub async fn destroy_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(String, String)>,
    mut session: CurrentSession,
) -> Result<Redirect, AppError> {
    let list_id = parse_id(&list_id)?;
    let todo_id: TodoId = parse_id(&todo_id)?;
    session.data.find_list_mut(list_id)?.remove_by_id(todo_id)?;
    session
        .data
        .flash(FlashKind::Success, "The todo has been deleted.");
    session.save(&state.sessions).await?;
    Ok(Redirect::to(&list_path(list_id)))
}
