use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Parser;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;

use liftdesk::{
    auth::AuthService,
    domain::{
        CreateFeedbackRequest, CreatePackageRequest, CreateRoomRequest, CreateScheduleRequest,
        CreateSessionRequest, CreateUserRequest, FeedbackTarget, Gender, Role, ScheduleEntry,
    },
    service::ServiceContext,
};

#[derive(Parser)]
#[command(about = "Seed the liftdesk database with demo data")]
struct Args {
    /// Number of demo members to create
    #[arg(long, default_value_t = 10)]
    members: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Starting database seeding...");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:liftdesk.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let auth_service = Arc::new(AuthService::new("seed-only-secret", 7));
    let ctx = ServiceContext::new(db_pool, auth_service);

    println!("Creating staff accounts...");
    let password_hash = AuthService::hash_password("ChangeMe@123")?;

    ctx.user_repo
        .create(CreateUserRequest {
            name: "Admin".to_string(),
            email: "admin@liftdesk.local".to_string(),
            password_hash: password_hash.clone(),
            phone: None,
            birth_year: None,
            gender: None,
            role: Role::Admin,
        })
        .await?;

    let staff = ctx
        .user_repo
        .create(CreateUserRequest {
            name: "Front Desk".to_string(),
            email: "staff@liftdesk.local".to_string(),
            password_hash: password_hash.clone(),
            phone: None,
            birth_year: None,
            gender: None,
            role: Role::Staff,
        })
        .await?;

    let coach = ctx
        .user_repo
        .create(CreateUserRequest {
            name: "Coach Carter".to_string(),
            email: "coach@liftdesk.local".to_string(),
            password_hash: password_hash.clone(),
            phone: None,
            birth_year: None,
            gender: None,
            role: Role::Coach,
        })
        .await?;

    println!("Creating packages...");
    let monthly = ctx
        .package_repo
        .create(CreatePackageRequest {
            name: "Monthly Basic".to_string(),
            duration_days: 30,
            session_limit: None,
            price: 500_000,
            with_trainer: false,
        })
        .await?;

    let pt20 = ctx
        .package_repo
        .create(CreatePackageRequest {
            name: "20-Session PT".to_string(),
            duration_days: 90,
            session_limit: Some(20),
            price: 4_000_000,
            with_trainer: true,
        })
        .await?;

    ctx.package_repo
        .create(CreatePackageRequest {
            name: "Annual".to_string(),
            duration_days: 365,
            session_limit: None,
            price: 4_800_000,
            with_trainer: false,
        })
        .await?;

    println!("Creating rooms...");
    ctx.room_repo
        .create(CreateRoomRequest {
            name: "Free Weights".to_string(),
            capacity: Some(30),
            location: Some("Ground floor".to_string()),
            description: Some("Racks, barbells and dumbbells up to 50kg".to_string()),
        })
        .await?;

    ctx.room_repo
        .create(CreateRoomRequest {
            name: "Studio A".to_string(),
            capacity: Some(20),
            location: Some("First floor".to_string()),
            description: Some("Group classes and personal training".to_string()),
        })
        .await?;

    println!("Creating {} demo members...", args.members);
    for i in 0..args.members {
        let name: String = Name().fake();
        let email: String = format!("{}.{}", i, FreeEmail().fake::<String>());
        let phone: String = PhoneNumber().fake();

        let member = ctx
            .user_repo
            .create(CreateUserRequest {
                name,
                email,
                password_hash: password_hash.clone(),
                phone: Some(phone),
                birth_year: Some((1970..2005).fake()),
                gender: Some(if i % 2 == 0 { Gender::Male } else { Gender::Female }),
                role: Role::Member,
            })
            .await?;

        let package = if i % 3 == 0 { &pt20 } else { &monthly };
        let membership = ctx
            .membership_service
            .register(member.id, package.id, i % 2 == 0)
            .await?;

        ctx.schedule_service
            .create(
                &coach,
                CreateScheduleRequest {
                    user_id: member.id,
                    coach_id: Some(coach.id),
                    created_by: coach.id,
                    entries: vec![ScheduleEntry {
                        day_of_week: "Monday".to_string(),
                        exercises: vec!["Squat".to_string(), "Bench press".to_string()],
                        date: Some((Utc::now() + Duration::days(1)).date_naive()),
                        start_time: Some("07:00".to_string()),
                        end_time: Some("08:00".to_string()),
                    }],
                    note: Some("Focus on form".to_string()),
                },
            )
            .await?;

        ctx.session_service
            .create(
                &staff,
                CreateSessionRequest {
                    user_id: member.id,
                    membership_id: Some(membership.id),
                    coach_id: Some(coach.id),
                    workout_date: (Utc::now() + Duration::days(2)).date_naive(),
                    start_time: Some("18:00".to_string()),
                    end_time: Some("19:00".to_string()),
                    exercise_name: "Full body".to_string(),
                    notes: None,
                },
            )
            .await?;

        if i % 4 == 0 {
            ctx.feedback_service
                .submit(CreateFeedbackRequest {
                    user_id: member.id,
                    rating: ((i % 5) + 1) as i32,
                    message: "Great facilities".to_string(),
                    target: FeedbackTarget::Gym,
                    related_user_id: None,
                })
                .await?;
        }
    }

    println!("Seeding complete.");
    println!("  admin:  admin@liftdesk.local / ChangeMe@123");
    println!("  staff:  staff@liftdesk.local / ChangeMe@123");
    println!("  coach:  coach@liftdesk.local / ChangeMe@123");

    Ok(())
}
