use http::StatusCode;
use serde_json::json;

mod common;

use crate::common::*;
use northstar::app::domain::GoalVisibility;

mod goals {
    use super::*;

    #[tokio::test]
    async fn members_create_goals_in_their_own_org() {
        let tree = Acme::new().await;
        let app = tree.router();
        let cookie = login_cookie(&app, "eng@acme.test").await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/organizations/{}/goals", tree.eng),
            Some(&cookie),
            Some(json!({
                "title": "Ship v2",
                "key_results": ["p99 under 200ms"],
                "visibility": "team_only"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Ship v2");
        assert_eq!(body["status"], "not_started");
        assert_eq!(body["progress"], 0);
        assert_eq!(body["visibility"], "team_only");
        assert_eq!(body["key_results"], json!(["p99 under 200ms"]));
        assert_eq!(body["organization_id"], tree.eng.as_str());
    }

    #[tokio::test]
    async fn other_orgs_cannot_create_goals() {
        let tree = Acme::new().await;
        let app = tree.router();
        let cookie = login_cookie(&app, "acme@acme.test").await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/organizations/{}/goals", tree.eng),
            Some(&cookie),
            Some(json!({ "title": "Top-down goal" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not permitted");
    }

    #[tokio::test]
    async fn invalid_goal_input_is_rejected() {
        let tree = Acme::new().await;
        let app = tree.router();
        let cookie = login_cookie(&app, "eng@acme.test").await;
        let uri = format!("/api/organizations/{}/goals", tree.eng);

        for body in [
            json!({ "title": "" }),
            json!({ "title": "x".repeat(256) }),
            json!({ "title": "Ok", "progress": 101 }),
            json!({ "title": "Ok", "progress": -1 }),
        ] {
            let (status, _) = send(&app, "POST", &uri, Some(&cookie), Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }
    }

    #[tokio::test]
    async fn blank_title_updates_are_rejected() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();
        let cookie = login_cookie(&app, "eng@acme.test").await;
        let uri = format!("/api/goals/{goal}");

        for title in ["   ", ""] {
            let (status, _) = send(
                &app,
                "PATCH",
                &uri,
                Some(&cookie),
                Some(json!({ "title": title, "progress": 50 })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{title:?}");
        }

        let (_, body) = send(&app, "GET", &uri, Some(&cookie), None).await;
        assert_eq!(body["title"], "Ship v2");
        assert_eq!(body["progress"], 10);

        let (status, body) = send(&app, "PATCH", &uri, Some(&cookie), Some(json!({ "title": "  Ship v3 " }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Ship v3");
    }

    #[tokio::test]
    async fn private_goals_are_hidden_outside_the_owner() {
        let tree = Acme::new().await;
        create_goal(&tree.pool, &tree.eng, "Public roadmap", GoalVisibility::Public).await;
        create_goal(&tree.pool, &tree.eng, "Team plan", GoalVisibility::TeamOnly).await;
        let secret = create_goal(&tree.pool, &tree.eng, "Reorg", GoalVisibility::Private).await;
        let app = tree.router();
        let uri = format!("/api/organizations/{}/goals", tree.eng);

        let own = login_cookie(&app, "eng@acme.test").await;
        let (_, body) = send(&app, "GET", &uri, Some(&own), None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let sibling = login_cookie(&app, "product@acme.test").await;
        let (status, body) = send(&app, "GET", &uri, Some(&sibling), None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(!titles.contains(&"Reorg"));

        let (status, _) = send(&app, "GET", &format!("/api/goals/{secret}"), Some(&sibling), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", &format!("/api/goals/{secret}"), Some(&own), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unrelated_orgs_cannot_list_goals() {
        let tree = Acme::new().await;
        create_goal(&tree.pool, &tree.eng, "Public roadmap", GoalVisibility::Public).await;
        let app = tree.router();
        let cookie = login_cookie(&app, "globex@acme.test").await;

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/organizations/{}/goals", tree.eng),
            Some(&cookie),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn only_the_owning_org_updates_and_deletes() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();
        let uri = format!("/api/goals/{goal}");

        let child = login_cookie(&app, "platform@acme.test").await;
        let (status, _) = send(&app, "PATCH", &uri, Some(&child), Some(json!({ "progress": 90 }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "DELETE", &uri, Some(&child), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let own = login_cookie(&app, "eng@acme.test").await;
        let (status, body) = send(
            &app,
            "PATCH",
            &uri,
            Some(&own),
            Some(json!({ "progress": 90, "status": "completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"], 90);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["title"], "Ship v2");

        let (status, _) = send(&app, "DELETE", &uri, Some(&own), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, Some(&own), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod comments {
    use super::*;

    async fn post_comment(
        app: &axum::Router,
        cookie: &str,
        goal: &str,
        kind: &str,
    ) -> (StatusCode, serde_json::Value) {
        send(
            app,
            "POST",
            &format!("/api/goals/{goal}/comments"),
            Some(cookie),
            Some(json!({ "content": "How does this affect us?", "kind": kind })),
        )
        .await
    }

    #[tokio::test]
    async fn siblings_and_children_may_ask_but_descendants_may_not() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();

        let sibling = login_cookie(&app, "product@acme.test").await;
        let (status, body) = post_comment(&app, &sibling, &goal, "question").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["kind"], "question");
        assert_eq!(body["status"], "pending");

        let child = login_cookie(&app, "platform@acme.test").await;
        let (status, _) = post_comment(&app, &child, &goal, "question").await;
        assert_eq!(status, StatusCode::CREATED);

        // Acme sees Engineering as a child: it may read and respond, not ask.
        let parent = login_cookie(&app, "acme@acme.test").await;
        let (status, _) = post_comment(&app, &parent, &goal, "question").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn notes_are_for_the_owning_org() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();

        let sibling = login_cookie(&app, "product@acme.test").await;
        let (status, _) = post_comment(&app, &sibling, &goal, "note").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let own = login_cookie(&app, "eng@acme.test").await;
        let (status, body) = post_comment(&app, &own, &goal, "note").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");

        let (status, body) = post_comment(&app, &own, &goal, "response").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "answered");
    }

    #[tokio::test]
    async fn reading_comments_follows_the_matrix() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();
        let sibling = login_cookie(&app, "product@acme.test").await;
        post_comment(&app, &sibling, &goal, "question").await;
        let uri = format!("/api/goals/{goal}/comments");

        let (status, _) = send(&app, "GET", &uri, Some(&sibling), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let parent = login_cookie(&app, "acme@acme.test").await;
        let (status, body) = send(&app, "GET", &uri, Some(&parent), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn questions_are_closed_by_those_who_may_respond() {
        let tree = Acme::new().await;
        let goal = create_goal(&tree.pool, &tree.eng, "Ship v2", GoalVisibility::Public).await;
        let app = tree.router();
        let sibling = login_cookie(&app, "product@acme.test").await;
        let (_, question) = post_comment(&app, &sibling, &goal, "question").await;
        let uri = format!("/api/comments/{}", question["id"].as_str().unwrap());

        let (status, _) = send(&app, "PATCH", &uri, Some(&sibling), Some(json!({ "status": "closed" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let own = login_cookie(&app, "eng@acme.test").await;
        let (status, body) = send(&app, "PATCH", &uri, Some(&own), Some(json!({ "status": "answered" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "answered");

        let (status, _) = send(
            &app,
            "PATCH",
            "/api/comments/01HZ9999999999999999999999",
            Some(&own),
            Some(json!({ "status": "closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
