use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::export::AttendanceGroup;
use crate::grid::{DayColumn, GridCell, WeekGrid};
use crate::handlers::DeleteGroupRequest;
use crate::models::{
    AttendanceItem, AttendanceRecord, AttendanceStatus, AttendanceSubmission, NewScheduleEntry,
    ScheduleEntry, ScheduleGroup,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_class_schedule,
        crate::handlers::get_class_grid,
        crate::handlers::create_schedule,
        crate::handlers::delete_schedule_group,
        crate::handlers::submit_attendance,
        crate::handlers::get_attendance_report,
        crate::handlers::get_attendance_csv,
        crate::handlers::get_attendance_summary
    ),
    components(schemas(
        ScheduleEntry,
        ScheduleGroup,
        NewScheduleEntry,
        DeleteGroupRequest,
        AttendanceStatus,
        AttendanceRecord,
        AttendanceSubmission,
        AttendanceItem,
        AttendanceGroup,
        WeekGrid,
        DayColumn,
        GridCell
    )),
    tags(
        (name = "schedule", description = "Class schedule management"),
        (name = "attendance", description = "Attendance reporting and export")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
