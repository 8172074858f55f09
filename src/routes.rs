//! Client-side route table.

/// Pages reachable from the portal navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    FindDoctor,
    Appointments,
    BookAppointment,
    Calendar,
    Bills,
    Claims,
    Prescriptions,
    Reports,
    Support,
    NotFound,
}

const ROUTES: [(&str, Page); 10] = [
    ("/client/dashboard", Page::Dashboard),
    ("/client/find-doctor", Page::FindDoctor),
    ("/client/appointments", Page::Appointments),
    ("/client/book-appointment", Page::BookAppointment),
    ("/client/calendar", Page::Calendar),
    ("/client/bills", Page::Bills),
    ("/client/claims", Page::Claims),
    ("/client/prescriptions", Page::Prescriptions),
    ("/client/reports", Page::Reports),
    ("/client/support", Page::Support),
];

impl Page {
    /// Resolve a path. The root goes to the dashboard and unknown paths
    /// fall back to `NotFound`.
    pub fn resolve(path: &str) -> Page {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Page::Dashboard;
        }
        ROUTES
            .iter()
            .find(|(route, _)| *route == trimmed)
            .map(|(_, page)| *page)
            .unwrap_or(Page::NotFound)
    }

    pub fn path(&self) -> Option<&'static str> {
        ROUTES
            .iter()
            .find(|(_, page)| page == self)
            .map(|(route, _)| *route)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::FindDoctor => "Find a Doctor",
            Page::Appointments => "My Appointments",
            Page::BookAppointment => "Book Appointment",
            Page::Calendar => "Calendar",
            Page::Bills => "Medical Bills",
            Page::Claims => "Insurance Claims",
            Page::Prescriptions => "Prescriptions",
            Page::Reports => "Lab Reports",
            Page::Support => "Support & Feedback",
            Page::NotFound => "Page Not Found",
        }
    }

    /// Pages shown in the navigation menu, in order.
    pub fn navigation() -> impl Iterator<Item = Page> {
        ROUTES.iter().map(|(_, page)| *page)
    }
}
