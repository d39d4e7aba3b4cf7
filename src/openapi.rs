use utoipa::OpenApi;

use crate::filter::Selections;
use crate::handlers::ScheduleResponse;
use crate::models::{
    ClassSession, Day, Intensity, PricingTier, Program, ScheduledClass, SessionType, Trainer,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::schedule_page,
        crate::handlers::get_schedule,
        crate::handlers::get_ical,
        crate::handlers::get_trainers,
        crate::handlers::get_programs,
        crate::handlers::get_pricing
    ),
    components(schemas(
        ScheduleResponse,
        ScheduledClass,
        Selections,
        ClassSession,
        Trainer,
        Program,
        PricingTier,
        Day,
        SessionType,
        Intensity
    )),
    tags(
        (name = "schedule", description = "Class schedule browsing and export"),
        (name = "catalog", description = "Static site content")
    ),
)]
pub struct ApiDoc;
