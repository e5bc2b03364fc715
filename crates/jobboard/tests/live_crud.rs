//! Live CRUD round-trips against a real database.
//!
//! These tests are skipped unless `DATABASE_URL` is set. Each test opens its
//! own connection and builds TEMPORARY tables, so runs are isolated and leave
//! nothing behind.

use jobboard::{
    Application, Company, CompanyPatch, CompanySearch, Job, JobPatch, JobSearch, NewCompany,
    NewJob, NewUser, User, UserPatch,
};
use rust_decimal::Decimal;

async fn try_connect() -> Option<tokio_postgres::Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

const SCHEMA: &str = "
CREATE TEMPORARY TABLE companies (
  handle VARCHAR(25) PRIMARY KEY,
  name TEXT UNIQUE NOT NULL,
  description TEXT NOT NULL,
  num_employees INTEGER CHECK (num_employees >= 0),
  logo_url TEXT
);
CREATE TEMPORARY TABLE users (
  username VARCHAR(25) PRIMARY KEY,
  password TEXT NOT NULL,
  first_name TEXT NOT NULL,
  last_name TEXT NOT NULL,
  email TEXT NOT NULL,
  is_admin BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE TEMPORARY TABLE jobs (
  id SERIAL PRIMARY KEY,
  title TEXT NOT NULL,
  salary INTEGER CHECK (salary >= 0),
  equity NUMERIC CHECK (equity <= 1.0),
  company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);
CREATE TEMPORARY TABLE applications (
  username VARCHAR(25) REFERENCES users ON DELETE CASCADE,
  job_id INTEGER REFERENCES jobs ON DELETE CASCADE,
  PRIMARY KEY (username, job_id)
);
";

async fn setup(client: &tokio_postgres::Client) {
    client.batch_execute(SCHEMA).await.expect("schema setup failed");
}

fn new_company(handle: &str, name: &str, num_employees: Option<i32>) -> NewCompany {
    NewCompany {
        handle: handle.to_string(),
        name: name.to_string(),
        description: format!("{name} does things"),
        num_employees,
        logo_url: None,
    }
}

#[tokio::test]
async fn company_crud_round_trip() {
    let Some(client) = try_connect().await else {
        return;
    };
    setup(&client).await;

    let created = Company::create(&client, new_company("acme", "Acme", Some(10)))
        .await
        .unwrap();
    assert_eq!(created.handle, "acme");
    assert_eq!(created.num_employees, Some(10));

    // A second create with the same handle is rejected up front.
    let dup = Company::create(&client, new_company("acme", "Acme Again", None))
        .await
        .unwrap_err();
    assert!(dup.is_validation());

    Company::create(&client, new_company("globex", "Globex", Some(500)))
        .await
        .unwrap();

    // Unfiltered search returns everything, ordered by name.
    let all = Company::find_all(&client, &CompanySearch::default())
        .await
        .unwrap();
    assert_eq!(
        all.iter().map(|c| c.handle.as_str()).collect::<Vec<_>>(),
        ["acme", "globex"]
    );

    // Substring match is case-insensitive.
    let found = Company::find_all(
        &client,
        &CompanySearch {
            name: Some("GLOB".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].handle, "globex");

    // Employee-range filters.
    let big = Company::find_all(
        &client,
        &CompanySearch {
            min_employees: Some(100),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(big.len(), 1);
    assert_eq!(big[0].handle, "globex");

    // Partial update touches only the supplied fields.
    let updated = Company::update(
        &client,
        "acme",
        CompanyPatch {
            num_employees: Some(25),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.num_employees, Some(25));
    assert_eq!(updated.name, "Acme");

    // Empty patch never reaches the database.
    let empty = Company::update(&client, "acme", CompanyPatch::default())
        .await
        .unwrap_err();
    assert!(empty.is_validation());

    // Updating a missing company reports not-found.
    let missing = Company::update(
        &client,
        "nope",
        CompanyPatch {
            name: Some("Nope".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(missing.is_not_found());

    Company::remove(&client, "acme").await.unwrap();
    assert!(Company::get(&client, "acme").await.unwrap_err().is_not_found());
    assert!(
        Company::remove(&client, "acme")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn job_search_filters() {
    let Some(client) = try_connect().await else {
        return;
    };
    setup(&client).await;

    Company::create(&client, new_company("acme", "Acme", Some(10)))
        .await
        .unwrap();

    let dev = Job::create(
        &client,
        NewJob {
            title: "developer".to_string(),
            salary: Some(120_000),
            equity: Some(Decimal::new(5, 2)), // 0.05
            company_handle: "acme".to_string(),
        },
    )
    .await
    .unwrap();
    Job::create(
        &client,
        NewJob {
            title: "accountant".to_string(),
            salary: Some(80_000),
            equity: None,
            company_handle: "acme".to_string(),
        },
    )
    .await
    .unwrap();

    // Title substring plus salary threshold.
    let found = Job::find_all(
        &client,
        &JobSearch {
            title: Some("velop".to_string()),
            min_salary: Some(100_000),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, dev.id);

    // hasEquity alone: only jobs with equity > 0.
    let with_equity = Job::find_all(
        &client,
        &JobSearch {
            has_equity: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(with_equity.len(), 1);
    assert_eq!(with_equity[0].title, "developer");

    // hasEquity=false is not a filter.
    let everything = Job::find_all(
        &client,
        &JobSearch {
            has_equity: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(everything.len(), 2);

    // Company detail embeds the company's jobs.
    let detail = Company::get(&client, "acme").await.unwrap();
    assert_eq!(detail.jobs.len(), 2);

    // Partial update and duplicate-title rejection.
    let renamed = Job::update(
        &client,
        dev.id,
        JobPatch {
            title: Some("senior developer".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.title, "senior developer");
    assert_eq!(renamed.salary, Some(120_000));

    let dup = Job::create(
        &client,
        NewJob {
            title: "accountant".to_string(),
            salary: None,
            equity: None,
            company_handle: "acme".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(dup.is_validation());

    Job::remove(&client, dev.id).await.unwrap();
    assert!(Job::get(&client, dev.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn user_and_application_flow() {
    let Some(client) = try_connect().await else {
        return;
    };
    setup(&client).await;

    Company::create(&client, new_company("acme", "Acme", Some(10)))
        .await
        .unwrap();
    let job = Job::create(
        &client,
        NewJob {
            title: "developer".to_string(),
            salary: Some(120_000),
            equity: None,
            company_handle: "acme".to_string(),
        },
    )
    .await
    .unwrap();

    let user = User::create(
        &client,
        NewUser {
            username: "aliya".to_string(),
            first_name: "Aliya".to_string(),
            last_name: "Foster".to_string(),
            email: "aliya@example.com".to_string(),
            password_hash: "$2b$12$notarealhash".to_string(),
            is_admin: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(user.username, "aliya");

    let applied = Application::apply(&client, "aliya", job.id).await.unwrap();
    assert_eq!(applied, job.id);

    // Applying twice is a caller error.
    let dup = Application::apply(&client, "aliya", job.id)
        .await
        .unwrap_err();
    assert!(dup.is_validation());

    // A missing job surfaces as not-found, not a raw constraint failure.
    let missing = Application::apply(&client, "aliya", job.id + 999)
        .await
        .unwrap_err();
    assert!(missing.is_not_found());

    // User detail lists the applied job ids.
    let detail = User::get(&client, "aliya").await.unwrap();
    assert_eq!(detail.applications, [job.id]);

    let updated = User::update(
        &client,
        "aliya",
        UserPatch {
            is_admin: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(updated.is_admin);
    assert_eq!(updated.first_name, "Aliya");

    Application::remove(&client, "aliya", job.id).await.unwrap();
    assert!(
        Application::remove(&client, "aliya", job.id)
            .await
            .unwrap_err()
            .is_not_found()
    );

    User::remove(&client, "aliya").await.unwrap();
    assert!(User::get(&client, "aliya").await.unwrap_err().is_not_found());
}
