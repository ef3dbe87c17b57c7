use smartScheduler::service::routing::{HeuristicRouter, Intent, IntentRouter};

#[tokio::test]
async fn routes_schedule_for_booking_verbs() {
    let router = HeuristicRouter;
    let result = router.route("Book a dentist appointment tomorrow at 3pm").await;
    assert_eq!(result.intent, Intent::Schedule);
}

#[tokio::test]
async fn routes_confirm_before_anything_else() {
    let router = HeuristicRouter;
    let result = router.route("Yes please, schedule it").await;
    assert_eq!(result.intent, Intent::Confirm);
}

#[tokio::test]
async fn routes_cook_for_kitchen_talk() {
    let router = HeuristicRouter;
    let result = router.route("I'll be in the kitchen until noon").await;
    assert_eq!(result.intent, Intent::Cook);
}

#[tokio::test]
async fn routes_date_inquiry_without_a_verb() {
    let router = HeuristicRouter;
    let result = router.route("What does next week look like?").await;
    assert_eq!(result.intent, Intent::DateInquiry);
}

#[tokio::test]
async fn routes_help_when_nothing_matches() {
    let router = HeuristicRouter;
    let result = router.route("hello there").await;
    assert_eq!(result.intent, Intent::Help);
}
