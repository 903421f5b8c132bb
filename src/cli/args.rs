use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "doula-admin",
    version,
    author,
    about = "Terminal admin console for the doula booking marketplace"
)]
pub struct Cli {
    /// API base URL for this run (overrides config and DOULA_ADMIN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Date window shared by the list commands. Dates are YYYY-MM-DD.
#[derive(Args, Debug, Clone, Default)]
pub struct DateRange {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PageArg {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with an emailed one-time code
    Login {
        /// Admin email address
        email: String,
        /// Supply the code directly instead of being prompted
        #[arg(long)]
        otp: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Customer bookings
    Bookings {
        #[command(subcommand)]
        action: Option<BookingCommands>,
        /// Search client, doula or service
        #[arg(long)]
        search: Option<String>,
        /// PENDING, ACTIVE, COMPLETED or CANCELED
        #[arg(long)]
        status: Option<String>,
        /// Service id
        #[arg(long)]
        service: Option<String>,
        /// Region id
        #[arg(long)]
        region: Option<String>,
        #[command(flatten)]
        dates: DateRange,
        #[command(flatten)]
        page: PageArg,
    },
    /// Doula work schedules
    Schedules {
        #[command(subcommand)]
        action: Option<ScheduleCommands>,
        /// PENDING, IN_PROGRESS, COMPLETED or CANCELED
        #[arg(long)]
        status: Option<String>,
        /// MORNING, NIGHT or FULLDAY
        #[arg(long)]
        shift: Option<String>,
        /// Service id
        #[arg(long)]
        service: Option<String>,
        /// Region id
        #[arg(long)]
        region: Option<String>,
        /// Doula id
        #[arg(long)]
        doula: Option<String>,
        #[command(flatten)]
        dates: DateRange,
        #[command(flatten)]
        page: PageArg,
    },
    /// Consultation meetings
    Meetings {
        #[command(subcommand)]
        action: Option<MeetingCommands>,
        /// Meeting id (partial match)
        #[arg(long)]
        search: Option<String>,
        /// SCHEDULED, COMPLETED or CANCELED
        #[arg(long)]
        status: Option<String>,
        /// Service id
        #[arg(long)]
        service: Option<String>,
        /// Region id
        #[arg(long)]
        region: Option<String>,
        /// Zone manager id
        #[arg(long)]
        zone_manager: Option<String>,
        #[command(flatten)]
        dates: DateRange,
        #[command(flatten)]
        page: PageArg,
    },
    /// Doula join enquiries
    Enquiries {
        #[command(subcommand)]
        action: Option<EnquiryCommands>,
        /// PENDING, IN_REVIEW, ACCEPTED or REJECTED
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        page: PageArg,
    },
    /// Doula profiles
    Doulas {
        #[command(subcommand)]
        action: Option<DoulaCommands>,
        #[arg(long)]
        search: Option<String>,
        /// Service name
        #[arg(long)]
        service: Option<String>,
        /// Region name
        #[arg(long)]
        region: Option<String>,
        /// available or unavailable
        #[arg(long)]
        availability: Option<String>,
        /// Only active (true) or inactive (false) profiles
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        page: PageArg,
    },
    /// Zone managers
    #[command(name = "zone-managers")]
    ZoneManagers {
        #[command(subcommand)]
        action: Option<ZoneManagerCommands>,
        #[arg(long)]
        search: Option<String>,
        /// Region id
        #[arg(long)]
        region: Option<String>,
        /// Only active (true) or inactive (false)
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        page: PageArg,
    },
    /// Service regions
    Regions {
        #[command(subcommand)]
        action: Option<RegionCommands>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArg,
    },
    /// Client testimonials
    Testimonials {
        #[command(subcommand)]
        action: Option<TestimonialCommands>,
        /// Doula id
        #[arg(long)]
        doula: Option<String>,
        /// Service id
        #[arg(long)]
        service: Option<String>,
        /// Star rating (1-5)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
        #[command(flatten)]
        dates: DateRange,
        #[command(flatten)]
        page: PageArg,
    },
    /// Total revenue for the selected filters
    Revenue {
        /// Doula id
        #[arg(long)]
        doula: Option<String>,
        /// Region id
        #[arg(long)]
        region: Option<String>,
        /// Service id
        #[arg(long)]
        service: Option<String>,
        #[command(flatten)]
        dates: DateRange,
    },
    /// Headline counts and daily activity
    Dashboard {
        /// Region id
        #[arg(long)]
        region: Option<String>,
    },
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// Move a booking to a new status
    SetStatus { id: String, status: String },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Move a schedule to a new status
    SetStatus { id: String, status: String },
}

#[derive(Subcommand, Debug)]
pub enum MeetingCommands {
    /// Show one meeting in full
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum EnquiryCommands {
    /// Move an enquiry to a new review status
    SetStatus { id: String, status: String },
}

#[derive(Subcommand, Debug)]
pub enum DoulaCommands {
    /// Delete a doula profile
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZoneManagerCommands {
    /// Show one zone manager with regions and doulas
    Show { id: String },
    /// Create a zone manager
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// 10-digit phone number
        #[arg(long)]
        phone: String,
        /// Region id to assign (repeatable)
        #[arg(long = "region", required = true)]
        regions: Vec<String>,
        /// Profile image file
        #[arg(long)]
        image: Option<String>,
    },
    /// Re-enable a zone manager
    Activate { id: String },
    /// Disable a zone manager
    Deactivate { id: String },
    /// Delete a zone manager
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RegionFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<String>,
    /// Mark the region inactive
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,
    /// Mark the region active
    #[arg(long)]
    pub active: bool,
}

#[derive(Subcommand, Debug)]
pub enum RegionCommands {
    /// Show one region
    Show { id: String },
    /// Create a region
    Create {
        #[command(flatten)]
        fields: RegionFields,
    },
    /// Update a region; omitted fields keep their current value
    Update {
        id: String,
        #[command(flatten)]
        fields: RegionFields,
    },
}

#[derive(Subcommand, Debug)]
pub enum TestimonialCommands {
    /// Show one testimonial in full
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Persist a new API base URL
    SetApiUrl { url: String },
}
