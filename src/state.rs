use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    AppointmentRepository, AvailabilityRepository, BusyTimeClient, CalendarDirectory,
    CalendarEventWriter, ConnectionRepository, OAuthTokenClient, TimelineRecorder,
};
use crate::domain::services::booking::BookingService;
use crate::domain::services::integration::GoogleIntegrationService;
use crate::domain::services::schedule::ScheduleService;
use crate::domain::services::slots::AvailabilityResolver;
use crate::domain::services::token_lifecycle::TokenLifecycleService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub schedule_service: Arc<ScheduleService>,
    pub lifecycle: Arc<TokenLifecycleService>,
    pub integration: Arc<GoogleIntegrationService>,
    pub resolver: Arc<AvailabilityResolver>,
    pub booking: Arc<BookingService>,
}

pub struct Ports {
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub oauth_client: Arc<dyn OAuthTokenClient>,
    pub busy_client: Arc<dyn BusyTimeClient>,
    pub event_writer: Arc<dyn CalendarEventWriter>,
    pub directory: Arc<dyn CalendarDirectory>,
    pub timeline: Arc<dyn TimelineRecorder>,
}

impl AppState {
    /// Wires the domain services over a set of ports. Tests hand in
    /// mocks through the same seam the factory uses for real adapters.
    pub fn assemble(config: Config, ports: Ports) -> Self {
        let schedule_service = Arc::new(ScheduleService::new(
            ports.availability_repo.clone(),
            ports.appointment_repo.clone(),
        ));
        let lifecycle = Arc::new(TokenLifecycleService::new(
            ports.connection_repo.clone(),
            ports.oauth_client.clone(),
        ));
        let integration = Arc::new(GoogleIntegrationService::new(
            ports.connection_repo.clone(),
            ports.oauth_client.clone(),
            ports.directory.clone(),
            lifecycle.clone(),
            config.google_oauth.clone(),
        ));
        let resolver = Arc::new(AvailabilityResolver::new(
            schedule_service.clone(),
            lifecycle.clone(),
            ports.connection_repo.clone(),
            ports.busy_client.clone(),
            config.slot_duration_min,
        ));
        let booking = Arc::new(BookingService::new(
            schedule_service.clone(),
            lifecycle.clone(),
            ports.connection_repo.clone(),
            ports.appointment_repo.clone(),
            ports.event_writer.clone(),
            ports.timeline.clone(),
            config.slot_duration_min,
        ));

        Self {
            config,
            schedule_service,
            lifecycle,
            integration,
            resolver,
            booking,
        }
    }
}
