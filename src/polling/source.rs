//! Backend jobs the poller can track.

use anyhow::Result;
use async_trait::async_trait;

use crate::api::{ArenaClient, Live20RunDetail, SimulationDetail};
use crate::models::JobStatus;

use super::state::{JobDetail, JobId};

/// Fetch and cancel operations for one kind of backend job.
#[async_trait]
pub trait JobSource: Send + Sync + 'static {
    type Detail: JobDetail + Clone + Send + Sync + 'static;

    async fn fetch(&self, id: JobId) -> Result<Self::Detail>;

    async fn cancel(&self, id: JobId) -> Result<()>;
}

impl JobDetail for SimulationDetail {
    fn status(&self) -> JobStatus {
        self.simulation.status
    }
}

impl JobDetail for Live20RunDetail {
    fn status(&self) -> JobStatus {
        self.run.status
    }
}

/// Arena simulations.
pub struct SimulationJobs {
    client: ArenaClient,
}

impl SimulationJobs {
    pub fn new(client: ArenaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for SimulationJobs {
    type Detail = SimulationDetail;

    async fn fetch(&self, id: JobId) -> Result<SimulationDetail> {
        self.client.get_simulation(id).await
    }

    async fn cancel(&self, id: JobId) -> Result<()> {
        self.client.cancel_simulation(id).await
    }
}

/// Live20 analysis runs.
pub struct Live20Jobs {
    client: ArenaClient,
}

impl Live20Jobs {
    pub fn new(client: ArenaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for Live20Jobs {
    type Detail = Live20RunDetail;

    async fn fetch(&self, id: JobId) -> Result<Live20RunDetail> {
        self.client.get_live20_run(id).await
    }

    async fn cancel(&self, id: JobId) -> Result<()> {
        self.client.cancel_live20_run(id).await
    }
}
