use habitdeck_core::reminder::scheduler::REMINDER_TITLE;
use habitdeck_core::{
    default_habits, Habit, MemoryKeyValueStore, NotificationError, NotificationRequest,
    NotificationService, PermissionStatus, ReminderOutcome, ReminderRepository, ReminderScheduler,
    ReminderSettings, ReminderTime, StorageWorker,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct FakeNotifications {
    deny_permission: bool,
    fail_schedule: bool,
    calls: Vec<&'static str>,
    scheduled: Vec<NotificationRequest>,
}

impl NotificationService for FakeNotifications {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError> {
        self.calls.push("permission");
        Ok(if self.deny_permission {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        })
    }

    fn cancel_all_scheduled(&mut self) -> Result<(), NotificationError> {
        self.calls.push("cancel");
        self.scheduled.clear();
        Ok(())
    }

    fn schedule(&mut self, request: &NotificationRequest) -> Result<String, NotificationError> {
        self.calls.push("schedule");
        if self.fail_schedule {
            return Err(NotificationError("channel missing".to_string()));
        }
        self.scheduled.push(request.clone());
        Ok(format!("notif-{}", self.scheduled.len()))
    }
}

fn enabled_at(time: &str) -> ReminderSettings {
    ReminderSettings {
        enabled: true,
        time: time.parse().unwrap(),
    }
}

#[test]
fn enabled_settings_schedule_one_daily_notification_for_active_habit() {
    let mut habits = default_habits();
    for habit in habits.iter_mut().skip(1) {
        habit.is_archived = true;
    }
    let mut scheduler = ReminderScheduler::new(FakeNotifications::default());
    let mut rng = StdRng::seed_from_u64(1);

    let outcome = scheduler.apply(&enabled_at("7:30"), &habits, &mut rng);

    assert_eq!(
        outcome,
        ReminderOutcome::Scheduled {
            notification_id: "notif-1".to_string(),
            habit_id: "1".to_string(),
        }
    );
    let service = scheduler.service();
    assert_eq!(service.calls, vec!["permission", "cancel", "schedule"]);
    let request = &service.scheduled[0];
    assert_eq!(request.title, REMINDER_TITLE);
    assert_eq!(request.body, "Today's suggestion: Meditate for 10 minutes");
    assert_eq!(request.daily_at, ReminderTime::new(7, 30).unwrap());
}

#[test]
fn rescheduling_replaces_previous_notification() {
    let habits = default_habits();
    let mut scheduler = ReminderScheduler::new(FakeNotifications::default());
    let mut rng = StdRng::seed_from_u64(2);

    scheduler.apply(&enabled_at("08:00"), &habits, &mut rng);
    scheduler.apply(&enabled_at("21:15"), &habits, &mut rng);

    let scheduled = &scheduler.service().scheduled;
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].daily_at.to_string(), "21:15");
}

#[test]
fn disabled_settings_only_cancel() {
    let mut scheduler = ReminderScheduler::new(FakeNotifications::default());
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = scheduler.apply(&ReminderSettings::default(), &default_habits(), &mut rng);

    assert_eq!(outcome, ReminderOutcome::Cancelled);
    assert_eq!(scheduler.service().calls, vec!["cancel"]);
}

#[test]
fn permission_denied_skips_scheduling() {
    let service = FakeNotifications {
        deny_permission: true,
        ..FakeNotifications::default()
    };
    let mut scheduler = ReminderScheduler::new(service);
    let mut rng = StdRng::seed_from_u64(4);

    let outcome = scheduler.apply(&enabled_at("09:00"), &default_habits(), &mut rng);

    assert_eq!(outcome, ReminderOutcome::PermissionDenied);
    assert_eq!(scheduler.service().calls, vec!["permission"]);
}

#[test]
fn no_active_habits_cancels_without_scheduling() {
    let habits: Vec<Habit> = default_habits()
        .into_iter()
        .map(|mut habit| {
            habit.is_archived = true;
            habit
        })
        .collect();
    let mut scheduler = ReminderScheduler::new(FakeNotifications::default());
    let mut rng = StdRng::seed_from_u64(5);

    let outcome = scheduler.apply(&enabled_at("09:00"), &habits, &mut rng);

    assert_eq!(outcome, ReminderOutcome::NoActiveHabits);
    assert!(scheduler.into_inner().scheduled.is_empty());
}

#[test]
fn schedule_failure_is_reported_as_outcome() {
    let service = FakeNotifications {
        fail_schedule: true,
        ..FakeNotifications::default()
    };
    let mut scheduler = ReminderScheduler::new(service);
    let mut rng = StdRng::seed_from_u64(6);

    let outcome = scheduler.apply(&enabled_at("09:00"), &default_habits(), &mut rng);
    assert!(matches!(outcome, ReminderOutcome::Failed(message) if message.contains("channel missing")));
}

#[test]
fn settings_round_trip_through_storage_and_fall_back_on_garbage() {
    let storage = MemoryKeyValueStore::new();
    let worker = StorageWorker::spawn(storage).unwrap();
    let repo = ReminderRepository::new(worker.handle());

    assert_eq!(repo.load().unwrap(), None);
    assert_eq!(repo.load_or_default(), ReminderSettings::default());

    let settings = enabled_at("18:45");
    repo.save(&settings).unwrap();
    assert_eq!(repo.load().unwrap(), Some(settings));

    worker
        .handle()
        .put("reminder_settings", r#"{"enabled":"yes"}"#.to_string())
        .unwrap();
    assert!(repo.load().is_err());
    assert_eq!(repo.load_or_default(), ReminderSettings::default());
}
