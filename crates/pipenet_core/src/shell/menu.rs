//! Main menu loop driving the record store.
//!
//! # Responsibility
//! - Map menu choices onto store, search and storage operations.
//! - Render records and outcomes as plain text.
//!
//! # Invariants
//! - The store is only mutated through `RecordStore` operations.
//! - A failed load keeps the current store.

use crate::model::pipe::Pipe;
use crate::model::record::{EntityKind, RecordId};
use crate::model::station::CompressorStation;
use crate::repo::record_store::{RecordStore, RepairAction};
use crate::repo::WorkshopDirection;
use crate::search::filter::{PipeFilter, StationFilter};
use crate::shell::{Confirmer, InputProvider, ShellError, ShellResult};
use crate::storage::file::{data_file_path, load_from_file, save_to_file};
use log::{info, warn};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

const MAIN_MENU: &str = "
Main Menu:
1. Add Pipe
2. Add Compressor Station
3. View All Objects
4. Edit Pipe Status
5. Edit Station Workshops
6. Delete Pipe
7. Delete Station
8. Search Pipes
9. Search Stations
10. Batch Edit Pipes
11. Batch Delete Pipes
12. Batch Delete Stations
13. Save Data
14. Load Data
0. Exit";

const LAST_MENU_CHOICE: i64 = 14;

/// Interactive session over one record store.
pub struct Shell<P, W> {
    store: RecordStore,
    data_dir: PathBuf,
    prompter: P,
    out: W,
}

impl<P, W> Shell<P, W>
where
    P: InputProvider + Confirmer,
    W: Write,
{
    /// Creates a session; save files are resolved relative to `data_dir`.
    pub fn new(store: RecordStore, data_dir: impl Into<PathBuf>, prompter: P, out: W) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
            prompter,
            out,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Output sink the session writes to.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> ShellResult<()> {
        info!("event=shell_start module=shell status=ok");
        loop {
            match self.step() {
                Ok(true) => continue,
                Ok(false) => {
                    writeln!(self.out, "Exiting program...")?;
                    break;
                }
                Err(ShellError::InputClosed) => {
                    info!("event=shell_input_closed module=shell status=ok");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        info!("event=shell_stop module=shell status=ok");
        Ok(())
    }

    /// Handles one main-menu choice; returns `false` on exit.
    fn step(&mut self) -> ShellResult<bool> {
        writeln!(self.out, "{MAIN_MENU}")?;
        let choice = self
            .prompter
            .read_int("Choose action: ", 0, LAST_MENU_CHOICE)?;
        match choice {
            1 => self.add_pipe()?,
            2 => self.add_station()?,
            3 => self.view_all()?,
            4 => self.edit_pipe_status()?,
            5 => self.edit_station_workshops()?,
            6 => self.delete_pipe()?,
            7 => self.delete_station()?,
            8 => self.search_pipes()?,
            9 => self.search_stations()?,
            10 => self.batch_edit_pipes()?,
            11 => self.batch_delete_pipes()?,
            12 => self.batch_delete_stations()?,
            13 => self.save()?,
            14 => self.load()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn add_pipe(&mut self) -> ShellResult<()> {
        writeln!(self.out, "Enter pipe data:")?;
        let name = self.prompter.read_text("Enter pipe name: ")?;
        let length = self
            .prompter
            .read_u32("Enter length (km, must be positive): ", 1, u32::MAX)?;
        let diameter = self
            .prompter
            .read_u32("Enter diameter (mm, must be positive): ", 1, u32::MAX)?;

        match Pipe::new(name, length, diameter) {
            Ok(pipe) => {
                let id = self.store.add_pipe(pipe);
                writeln!(self.out, "Pipe added successfully! (ID: {id})")?;
            }
            Err(err) => writeln!(self.out, "Pipe rejected: {err}")?,
        }
        Ok(())
    }

    fn add_station(&mut self) -> ShellResult<()> {
        writeln!(self.out, "Enter station data:")?;
        let name = self.prompter.read_text("Enter station name: ")?;
        let total = self
            .prompter
            .read_u32("Enter total workshops: ", 0, u32::MAX)?;
        let active = self
            .prompter
            .read_u32("Enter active workshops: ", 0, total)?;
        let class = self
            .prompter
            .read_i32("Enter station class: ", i32::MIN, i32::MAX)?;

        match CompressorStation::new(name, total, active, class) {
            Ok(station) => {
                let id = self.store.add_station(station);
                writeln!(self.out, "Station added successfully! (ID: {id})")?;
            }
            Err(err) => writeln!(self.out, "Station rejected: {err}")?,
        }
        Ok(())
    }

    fn view_all(&mut self) -> ShellResult<()> {
        writeln!(self.out, "\n=== CURRENT STATE ===")?;
        self.show_all_pipes()?;
        self.show_all_stations()
    }

    fn show_all_pipes(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available.")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== ALL PIPES ===")?;
        for pipe in self.store.pipes() {
            writeln!(self.out, "{pipe}")?;
        }
        Ok(())
    }

    fn show_all_stations(&mut self) -> ShellResult<()> {
        if self.store.station_count() == 0 {
            writeln!(self.out, "No stations available.")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== ALL COMPRESSOR STATIONS ===")?;
        for station in self.store.stations() {
            writeln!(self.out, "{station}")?;
        }
        Ok(())
    }

    fn edit_pipe_status(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available to edit!")?;
            return Ok(());
        }
        self.show_all_pipes()?;
        let id = self
            .prompter
            .read_u32("\nEnter pipe ID to edit: ", 1, u32::MAX)?;
        let status = match self.store.pipe(id) {
            Ok(pipe) => pipe.status_label(),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };
        writeln!(self.out, "Current repair status: {status}")?;

        if self.prompter.confirm("Change repair status?")? {
            match self.store.toggle_repair(id) {
                Ok(_) => writeln!(self.out, "Status changed successfully!")?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
        Ok(())
    }

    fn edit_station_workshops(&mut self) -> ShellResult<()> {
        if self.store.station_count() == 0 {
            writeln!(self.out, "No stations available to edit!")?;
            return Ok(());
        }
        self.show_all_stations()?;
        let id = self
            .prompter
            .read_u32("\nEnter station ID to edit: ", 1, u32::MAX)?;
        let (active, total) = match self.store.station(id) {
            Ok(station) => (station.active_workshops, station.total_workshops),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };
        writeln!(self.out, "Current workshops: {active}/{total} active")?;
        writeln!(self.out, "1. Start workshop\n2. Stop workshop")?;

        let direction = match self.prompter.read_int("Choose action: ", 1, 2)? {
            1 => WorkshopDirection::Start,
            _ => WorkshopDirection::Stop,
        };
        let amount = self
            .prompter
            .read_u32("Enter number of workshops: ", 1, u32::MAX)?;

        match self.store.adjust_workshops(id, amount, direction) {
            Ok(now_active) => writeln!(
                self.out,
                "{amount} workshop(s) {}; now {now_active}/{total} active",
                match direction {
                    WorkshopDirection::Start => "started",
                    WorkshopDirection::Stop => "stopped",
                }
            )?,
            Err(err) => writeln!(self.out, "{err}")?,
        }
        Ok(())
    }

    fn delete_pipe(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available to delete!")?;
            return Ok(());
        }
        self.show_all_pipes()?;
        let id = self
            .prompter
            .read_u32("\nEnter pipe ID to delete: ", 1, u32::MAX)?;
        let name = match self.store.pipe(id) {
            Ok(pipe) => pipe.name.clone(),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };

        writeln!(self.out, "You are about to delete pipe: {name} (ID: {id})")?;
        if self.prompter.confirm("Are you sure?")? {
            match self.store.delete_pipe(id) {
                Ok(_) => writeln!(self.out, "Pipe deleted successfully!")?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
        Ok(())
    }

    fn delete_station(&mut self) -> ShellResult<()> {
        if self.store.station_count() == 0 {
            writeln!(self.out, "No stations available to delete!")?;
            return Ok(());
        }
        self.show_all_stations()?;
        let id = self
            .prompter
            .read_u32("\nEnter station ID to delete: ", 1, u32::MAX)?;
        let name = match self.store.station(id) {
            Ok(station) => station.name.clone(),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };

        writeln!(self.out, "You are about to delete station: {name} (ID: {id})")?;
        if self.prompter.confirm("Are you sure?")? {
            match self.store.delete_station(id) {
                Ok(_) => writeln!(self.out, "Station deleted successfully!")?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
        }
        Ok(())
    }

    /// Asks for pipe search criteria; `None` means the user backed out.
    fn prompt_pipe_filter(&mut self) -> ShellResult<Option<PipeFilter>> {
        writeln!(
            self.out,
            "1. Search by name\n2. Search by repair status\n0. Back to main menu"
        )?;
        let filter = match self.prompter.read_int("Choose search type: ", 0, 2)? {
            1 => PipeFilter::NameContains(
                self.prompter.read_text("Enter pipe name to search for: ")?,
            ),
            2 => {
                writeln!(self.out, "Search for pipes:\n1. Under repair\n2. Operational")?;
                PipeFilter::RepairStatus(self.prompter.read_int("Choose status: ", 1, 2)? == 1)
            }
            _ => return Ok(None),
        };
        Ok(Some(filter))
    }

    fn show_pipes(&mut self, ids: &[RecordId]) -> ShellResult<()> {
        writeln!(self.out, "\n=== FOUND PIPES ===")?;
        for id in ids {
            if let Ok(pipe) = self.store.pipe(*id) {
                writeln!(self.out, "{pipe}")?;
            }
        }
        writeln!(self.out, "Total found: {} pipe(s)", ids.len())?;
        Ok(())
    }

    fn show_stations(&mut self, ids: &[RecordId], with_unused: bool) -> ShellResult<()> {
        writeln!(self.out, "\n=== FOUND STATIONS ===")?;
        for id in ids {
            let Ok(station) = self.store.station(*id) else {
                continue;
            };
            match station.unused_percentage().filter(|_| with_unused) {
                Some(unused) => writeln!(
                    self.out,
                    "ID: {} | Name: {} | Workshops: {}/{} | Unused: {unused:.1}% | Class: {}",
                    station.id,
                    station.name,
                    station.active_workshops,
                    station.total_workshops,
                    station.station_class
                )?,
                None => writeln!(self.out, "{station}")?,
            }
        }
        writeln!(self.out, "Total found: {} station(s)", ids.len())?;
        Ok(())
    }

    fn search_pipes(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available to search!")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== PIPE SEARCH ===")?;
        let Some(filter) = self.prompt_pipe_filter()? else {
            return Ok(());
        };
        let found = self.store.select_pipes(&filter);
        if found.is_empty() {
            writeln!(self.out, "No pipes found with the selected criteria.")?;
            return Ok(());
        }
        self.show_pipes(&found)
    }

    fn search_stations(&mut self) -> ShellResult<()> {
        if self.store.station_count() == 0 {
            writeln!(self.out, "No stations available to search!")?;
            return Ok(());
        }
        writeln!(
            self.out,
            "\n=== STATION SEARCH ===\n1. Search by name\n2. Search by percentage of unused workshops\n0. Back to main menu"
        )?;
        let filter = match self.prompter.read_int("Choose search type: ", 0, 2)? {
            1 => StationFilter::NameContains(
                self.prompter
                    .read_text("Enter station name to search for: ")?,
            ),
            2 => {
                writeln!(
                    self.out,
                    "Search stations by percentage of unused workshops (0-100%)"
                )?;
                let min = self
                    .prompter
                    .read_f64("Enter minimum percentage: ", 0.0, 100.0)?;
                let max = self
                    .prompter
                    .read_f64("Enter maximum percentage: ", min, 100.0)?;
                StationFilter::UnusedPercentage { min, max }
            }
            _ => return Ok(()),
        };

        let found = self.store.select_stations(&filter);
        if found.is_empty() {
            writeln!(self.out, "No stations found with the selected criteria.")?;
            return Ok(());
        }
        let with_unused = matches!(filter, StationFilter::UnusedPercentage { .. });
        self.show_stations(&found, with_unused)
    }

    fn batch_edit_pipes(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available to edit!")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== BATCH PIPE EDITING ===")?;
        let Some(filter) = self.prompt_pipe_filter()? else {
            return Ok(());
        };
        let found = self.store.select_pipes(&filter);
        if found.is_empty() {
            writeln!(self.out, "No pipes found with the selected criteria.")?;
            return Ok(());
        }
        self.show_pipes(&found)?;

        writeln!(
            self.out,
            "\nBatch editing options:\n1. Edit all found pipes\n2. Select specific pipes to edit\n0. Cancel"
        )?;
        let targets = match self.prompter.read_int("Choose editing mode: ", 0, 2)? {
            1 => found,
            2 => self.select_subset(&found)?,
            _ => return Ok(()),
        };
        if targets.is_empty() {
            writeln!(self.out, "No valid pipe IDs selected.")?;
            return Ok(());
        }
        writeln!(self.out, "Selected {} pipes for editing.", targets.len())?;

        writeln!(
            self.out,
            "\nChoose editing action:\n1. Mark as under repair\n2. Mark as operational\n3. Toggle repair status (swap current status)"
        )?;
        let action = match self.prompter.read_int("Choose action: ", 1, 3)? {
            1 => RepairAction::MarkUnderRepair,
            2 => RepairAction::MarkOperational,
            _ => RepairAction::ToggleRepair,
        };
        let changed = self.store.batch_mutate(&targets, action);
        writeln!(
            self.out,
            "Successfully updated repair status for {changed} pipes."
        )?;

        if self.prompter.confirm("Show updated pipes?")? {
            self.show_pipes(&targets)?;
        }
        Ok(())
    }

    /// Reads space-separated IDs and keeps those present in `candidates`.
    fn select_subset(&mut self, candidates: &[RecordId]) -> ShellResult<Vec<RecordId>> {
        let line = self
            .prompter
            .read_text("Enter pipe IDs to edit (separated by spaces): ")?;
        let mut selected = BTreeSet::new();
        for token in line.split_whitespace() {
            match token.parse::<RecordId>() {
                Ok(id) if candidates.contains(&id) => {
                    selected.insert(id);
                }
                Ok(id) => writeln!(
                    self.out,
                    "Pipe ID {id} not found in search results. Skipping."
                )?,
                Err(_) => writeln!(self.out, "`{token}` is not a pipe ID. Skipping.")?,
            }
        }
        Ok(selected.into_iter().collect())
    }

    fn batch_delete_pipes(&mut self) -> ShellResult<()> {
        if self.store.pipe_count() == 0 {
            writeln!(self.out, "No pipes available to delete!")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== BATCH PIPE DELETION ===")?;
        let Some(filter) = self.prompt_pipe_filter()? else {
            return Ok(());
        };
        let found = self.store.select_pipes(&filter);
        if found.is_empty() {
            writeln!(self.out, "No pipes found with the selected criteria.")?;
            return Ok(());
        }
        self.show_pipes(&found)?;

        if self.prompter.confirm("Delete all these pipes?")? {
            let deleted = self.store.batch_delete(EntityKind::Pipe, &found);
            writeln!(self.out, "Successfully deleted {deleted} pipes.")?;
        }
        Ok(())
    }

    fn batch_delete_stations(&mut self) -> ShellResult<()> {
        if self.store.station_count() == 0 {
            writeln!(self.out, "No stations available to delete!")?;
            return Ok(());
        }
        writeln!(self.out, "\n=== BATCH STATION DELETION ===")?;
        let needle = self
            .prompter
            .read_text("Enter station name to search for: ")?;
        let found = self.store.find_by_name(EntityKind::Station, &needle);
        if found.is_empty() {
            writeln!(self.out, "No stations found with the specified name.")?;
            return Ok(());
        }
        self.show_stations(&found, false)?;

        if self.prompter.confirm("Delete all these stations?")? {
            let deleted = self.store.batch_delete(EntityKind::Station, &found);
            writeln!(self.out, "Successfully deleted {deleted} stations.")?;
        }
        Ok(())
    }

    fn save(&mut self) -> ShellResult<()> {
        let name = self
            .prompter
            .read_text("Enter filename to save (without extension): ")?;
        let path = data_file_path(&self.data_dir, &name);
        if path.exists() && !self.prompter.confirm("File already exists. Overwrite?")? {
            writeln!(self.out, "Save cancelled.")?;
            return Ok(());
        }

        match save_to_file(&self.store, &path) {
            Ok(()) => {
                writeln!(self.out, "Data successfully saved to {}", path.display())?;
                writeln!(
                    self.out,
                    "Saved: {} pipes, {} stations",
                    self.store.pipe_count(),
                    self.store.station_count()
                )?;
            }
            Err(err) => writeln!(self.out, "Error: {err}")?,
        }
        Ok(())
    }

    fn load(&mut self) -> ShellResult<()> {
        let name = self
            .prompter
            .read_text("Enter filename to load (without extension): ")?;
        let path = data_file_path(&self.data_dir, &name);
        if !path.is_file() {
            writeln!(self.out, "Error: Could not open file {}", path.display())?;
            return Ok(());
        }
        if !self.store.is_empty()
            && !self
                .prompter
                .confirm("Current data will be overwritten. Continue?")?
        {
            writeln!(self.out, "Load cancelled.")?;
            return Ok(());
        }

        match load_from_file(&path) {
            Ok(loaded) => {
                self.store = loaded;
                writeln!(self.out, "Data successfully loaded from {}", path.display())?;
                writeln!(
                    self.out,
                    "Loaded: {} pipes, {} stations",
                    self.store.pipe_count(),
                    self.store.station_count()
                )?;
                writeln!(
                    self.out,
                    "Next available IDs - Pipe: {}, Station: {}",
                    self.store.allocator(EntityKind::Pipe).next_candidate(),
                    self.store.allocator(EntityKind::Station).next_candidate()
                )?;
            }
            Err(err) => {
                warn!("event=shell_load module=shell status=error path={}", path.display());
                writeln!(self.out, "Error: {err}")?;
                writeln!(self.out, "Current data was kept unchanged.")?;
            }
        }
        Ok(())
    }
}
