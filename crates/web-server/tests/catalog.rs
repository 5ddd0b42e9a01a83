mod common;

use axum::http::StatusCode;
use common::{app, json, location, multipart};
use core_types::DEFAULT_IMAGE;
use database::{NewExercise, NewWorkout};

#[tokio::test]
async fn create_workout_requires_login() {
    let app = app().await;

    let response = app.get("/entrenamientos/crear", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/inicio_sesion?next=/entrenamientos/crear"
    );

    let cookie = app.signed_in("ana").await;
    let response = app.get("/entrenamientos/crear", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["view"], "workouts/create");
    assert_eq!(body["form"]["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn created_workout_shows_up_in_listing() {
    let app = app().await;
    let cookie = app.signed_in("ana").await;
    let squat = app
        .state
        .db_repo
        .create_exercise(&NewExercise {
            name: "Sentadilla".into(),
            description: "Piernas".into(),
            image: DEFAULT_IMAGE.into(),
        })
        .await
        .unwrap();

    let body = multipart(
        &[
            ("titulo", "Entrenamiento prueba"),
            ("descripcion", "Descripción de prueba"),
            ("ejercicios", &squat.id.to_string()),
        ],
        None,
    );
    let response = app
        .post_multipart("/entrenamientos/crear", &cookie, body)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/entrenamientos");

    let listing = json(app.get("/entrenamientos", None).await).await;
    let items = listing["workouts"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Entrenamiento prueba");
    assert_eq!(items[0]["image"], DEFAULT_IMAGE);

    let id = items[0]["id"].as_i64().unwrap();
    let detail = json(
        app.get(&format!("/entrenamiento/{id}?mostrar=ejercicios"), None)
            .await,
    )
    .await;
    assert_eq!(detail["mode"], "ejercicios");
    assert_eq!(detail["exercises"]["items"][0]["name"], "Sentadilla");
    assert_eq!(detail["bookmarked"], false);
}

#[tokio::test]
async fn invalid_workout_re_renders_form_with_values() {
    let app = app().await;
    let cookie = app.signed_in("ana").await;

    let body = multipart(
        &[("titulo", "  "), ("descripcion", "Sin título"), ("ejercicios", "999")],
        None,
    );
    let response = app
        .post_multipart("/entrenamientos/crear", &cookie, body)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let form = json(response).await;
    assert_eq!(form["form"]["values"]["descripcion"], "Sin título");
    let fields: Vec<_> = form["form"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"titulo".to_string()));
    assert!(fields.contains(&"ejercicios".to_string()));

    let listing = json(app.get("/entrenamientos", None).await).await;
    assert_eq!(listing["workouts"]["total"], 0);
}

#[tokio::test]
async fn deleted_workout_is_gone_from_listing_and_detail() {
    let app = app().await;
    let cookie = app.signed_in("ana").await;
    let workout = app
        .state
        .db_repo
        .create_workout(
            &NewWorkout {
                title: "Cardio".into(),
                description: "Correr".into(),
                image: DEFAULT_IMAGE.into(),
            },
            &[],
        )
        .await
        .unwrap();

    let response = app
        .post_empty(&format!("/entrenamientos/eliminar/{}", workout.id), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let listing = json(app.get("/entrenamientos", None).await).await;
    assert_eq!(listing["workouts"]["total"], 0);

    let response = app
        .get(&format!("/entrenamiento/{}", workout.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_workout_detail_is_not_found() {
    let app = app().await;
    let response = app.get("/entrenamiento/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exercise_search_is_case_insensitive() {
    let app = app().await;
    for name in ["Ejercicio 1", "Ejercicio 2", "Plancha"] {
        app.state
            .db_repo
            .create_exercise(&NewExercise {
                name: name.into(),
                description: "desc".into(),
                image: DEFAULT_IMAGE.into(),
            })
            .await
            .unwrap();
    }

    let found = json(app.get("/ejercicios?q=ejer", None).await).await;
    assert_eq!(found["show_exercises"], true);
    assert_eq!(found["query"], "ejer");
    assert_eq!(found["exercises"]["total"], 2);
    assert_eq!(found["exercises"]["items"][0]["name"], "Ejercicio 1");

    let none = json(app.get("/ejercicios?q=zzz", None).await).await;
    assert_eq!(none["exercises"]["total"], 0);
    assert_eq!(none["exercises"]["items"], serde_json::json!([]));
}

#[tokio::test]
async fn page_cursor_is_clamped() {
    let app = app().await;
    for n in 1..=4 {
        app.state
            .db_repo
            .create_workout(
                &NewWorkout {
                    title: format!("Rutina {n}"),
                    description: "desc".into(),
                    image: DEFAULT_IMAGE.into(),
                },
                &[],
            )
            .await
            .unwrap();
    }

    let last = json(app.get("/entrenamientos?page=99", None).await).await;
    assert_eq!(last["workouts"]["number"], 2);
    assert_eq!(last["workouts"]["items"].as_array().unwrap().len(), 1);

    let first = json(app.get("/entrenamientos?page=abc", None).await).await;
    assert_eq!(first["workouts"]["number"], 1);
    assert_eq!(first["workouts"]["has_next"], true);
}

#[tokio::test]
async fn repeated_query_keys_use_the_last_value() {
    let app = app().await;
    for title in ["Pierna", "Brazo", "Espalda", "Pecho"] {
        app.state
            .db_repo
            .create_workout(
                &NewWorkout {
                    title: title.into(),
                    description: "desc".into(),
                    image: DEFAULT_IMAGE.into(),
                },
                &[],
            )
            .await
            .unwrap();
    }

    let response = app.get("/entrenamientos?page=1&page=2", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["workouts"]["number"], 2);

    let response = app.get("/entrenamientos?q=zzz&q=pie", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["query"], "pie");
    assert_eq!(body["workouts"]["total"], 1);
}

#[tokio::test]
async fn exercise_image_is_stored_and_removed_with_the_exercise() {
    let app = app().await;
    let cookie = app.signed_in("ana").await;

    let body = multipart(
        &[("nombre", "Dominadas"), ("descripcion", "Espalda")],
        Some(("dominadas.png", b"\x89PNG fake")),
    );
    let response = app.post_multipart("/ejercicios/crear", &cookie, body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/ejercicios");

    let exercise = app.state.db_repo.all_exercises().await.unwrap().remove(0);
    assert_eq!(exercise.image, "imagenes_ejercicio/dominadas.png");
    let stored = app.media.path().join(&exercise.image);
    assert!(stored.exists());

    let response = app
        .post_empty(&format!("/ejercicios/eliminar/{}", exercise.id), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!stored.exists());
    assert!(app.state.db_repo.all_exercises().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_without_upload_keeps_the_current_image() {
    let app = app().await;
    let cookie = app.signed_in("ana").await;
    let exercise = app
        .state
        .db_repo
        .create_exercise(&NewExercise {
            name: "Remo".into(),
            description: "Espalda".into(),
            image: "imagenes_ejercicio/remo.webp".into(),
        })
        .await
        .unwrap();

    let edit_form = json(
        app.get(&format!("/ejercicios/editar/{}", exercise.id), Some(&cookie))
            .await,
    )
    .await;
    assert_eq!(edit_form["form"]["values"]["nombre"], "Remo");

    let body = multipart(&[("nombre", "Remo con barra"), ("descripcion", "Espalda")], None);
    let response = app
        .post_multipart(&format!("/ejercicios/editar/{}", exercise.id), &cookie, body)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = app.state.db_repo.get_exercise(exercise.id).await.unwrap();
    assert_eq!(updated.name, "Remo con barra");
    assert_eq!(updated.image, "imagenes_ejercicio/remo.webp");
}
