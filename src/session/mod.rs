use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::geocode::{Coordinate, Geocoder};
use crate::hospitals::{HospitalFinder, HospitalRecord};
use crate::medication;
use crate::ui;

pub const DEFAULT_RADIUS_METERS: u64 = 5000;

const EXIT_SENTINEL: &str = "exit";

/// The two outbound lookups the session depends on
pub trait HospitalLocator {
    fn resolve(&self, location: &str) -> Result<Coordinate, LookupError>;
    fn find_nearby(&self, coordinate: Coordinate, radius_meters: u64) -> Result<Vec<HospitalRecord>, LookupError>;
}

/// Nominatim + Overpass
pub struct OsmLocator {
    pub geocoder: Geocoder,
    pub finder: HospitalFinder,
}

impl HospitalLocator for OsmLocator {
    fn resolve(&self, location: &str) -> Result<Coordinate, LookupError> {
        self.geocoder.resolve(location)
    }

    fn find_nearby(&self, coordinate: Coordinate, radius_meters: u64) -> Result<Vec<HospitalRecord>, LookupError> {
        self.finder.find_nearby(coordinate, radius_meters)
    }
}

/// Everything collected in one pass of the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub condition: String,
    pub location: String,
    pub radius_meters: u64,
}

/// Prompting state: either a full request, or the user is done
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Search(SearchRequest),
    Terminated,
}

/// Digits-only positive integer, anything else falls back to the default.
pub fn parse_radius(raw: &str) -> u64 {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_RADIUS_METERS;
    }
    match raw.parse::<u64>() {
        Ok(r) if r > 0 => r,
        _ => DEFAULT_RADIUS_METERS,
    }
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_SENTINEL)
}

pub struct Session<L, R, W> {
    locator: L,
    input: R,
    out: W,
    delay: Duration,
}

impl<L: HospitalLocator, R: BufRead, W: Write> Session<L, R, W> {
    pub fn new(locator: L, input: R, out: W, delay: Duration) -> Self {
        Self {
            locator,
            input,
            out,
            delay,
        }
    }

    /// Run until the exit sentinel or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        ui::display_welcome(&mut self.out, &medication::conditions())?;

        loop {
            match self.next_request()? {
                Step::Terminated => {
                    ui::display_goodbye(&mut self.out)?;
                    return Ok(());
                }
                Step::Search(request) => {
                    self.serve(&request)?;
                    // Throttle so we stay inside the public API usage policies
                    thread::sleep(self.delay);
                }
            }
        }
    }

    /// Collect condition, location and radius, honoring the exit sentinel.
    pub fn next_request(&mut self) -> io::Result<Step> {
        let condition = match ui::prompt(
            &mut self.input,
            &mut self.out,
            "Enter your disease (e.g., diabetes, flu, cough) or type 'exit' to quit",
        )? {
            Some(c) if !is_exit(&c) => c,
            _ => return Ok(Step::Terminated),
        };

        let location = match ui::prompt(
            &mut self.input,
            &mut self.out,
            "Enter your location (city/zip) or type 'exit' to quit",
        )? {
            Some(l) if !is_exit(&l) => l,
            _ => return Ok(Step::Terminated),
        };

        let radius_meters = match ui::prompt(
            &mut self.input,
            &mut self.out,
            "Enter search radius in meters (default 5000m)",
        )? {
            Some(r) => parse_radius(&r),
            None => return Ok(Step::Terminated),
        };

        Ok(Step::Search(SearchRequest {
            condition,
            location,
            radius_meters,
        }))
    }

    /// One full iteration: hospitals first, then medications.
    pub fn serve(&mut self, request: &SearchRequest) -> io::Result<()> {
        ui::display_searching(&mut self.out)?;

        let hospitals = self.search_hospitals(request)?;
        ui::display_hospitals(&mut self.out, &request.location, &hospitals)?;

        let medications = medication::lookup(&request.condition);
        ui::display_medications(&mut self.out, &request.condition, &medications)
    }

    fn search_hospitals(&mut self, request: &SearchRequest) -> io::Result<Vec<HospitalRecord>> {
        let spinner = ui::searching_spinner();
        ui::spinner_stage(&spinner, "Resolving location...");
        let coordinate = self.locator.resolve(&request.location);
        let result = match coordinate {
            Ok(coordinate) => {
                debug!("Searching {}m around {:?}", request.radius_meters, coordinate);
                ui::spinner_stage(&spinner, "Searching nearby hospitals...");
                self.locator
                    .find_nearby(coordinate, request.radius_meters)
                    .map_err(|e| (Stage::Hospitals, e))
            }
            Err(e) => Err((Stage::Location, e)),
        };
        spinner.finish_and_clear();

        match result {
            Ok(hospitals) => Ok(hospitals),
            Err((stage, e)) => {
                warn!("Hospital search for {:?} failed: {}", request.location, e);
                ui::display_problem(&mut self.out, &describe_failure(stage, &e, request))?;
                Ok(Vec::new())
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Location,
    Hospitals,
}

fn describe_failure(stage: Stage, error: &LookupError, request: &SearchRequest) -> String {
    match (stage, error) {
        (_, LookupError::NotFound) => "No location data found. Please try another city or zip code.".to_string(),
        (_, LookupError::EmptyResult { radius_meters }) => {
            format!("No hospitals found within {}m of {}.", radius_meters, request.location)
        }
        (Stage::Location, e) => format!("Error fetching location: {}", e),
        (Stage::Hospitals, e) => format!("Error fetching hospitals: {}", e),
    }
}
