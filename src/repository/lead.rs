use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::types::RecordId;
use crate::repository::errors::ApiResult;
use crate::repository::{
    LeadListQuery, LeadReader, LeadWriter, ListEnvelope, Page, RecordEnvelope, RestRepository,
};

/// Backend collection holding leads.
pub const LEAD_RESOURCE: &str = "lead";

impl LeadReader for RestRepository {
    async fn list_leads(&self, query: LeadListQuery) -> ApiResult<Page<Lead>> {
        let envelope: ListEnvelope<Lead> = self
            .http()
            .get_all(LEAD_RESOURCE, &query.to_params("status"))
            .await?;

        Ok(envelope.into_page(query.page()))
    }

    async fn get_lead(&self, id: &RecordId) -> ApiResult<Lead> {
        let envelope: RecordEnvelope<Lead> =
            self.http().get_by_id(LEAD_RESOURCE, id.as_str()).await?;
        Ok(envelope.into_inner())
    }
}

impl LeadWriter for RestRepository {
    async fn create_lead(&self, payload: &LeadPayload) -> ApiResult<Lead> {
        let envelope: RecordEnvelope<Lead> = self.http().create(LEAD_RESOURCE, payload).await?;
        Ok(envelope.into_inner())
    }

    async fn update_lead(&self, id: &RecordId, payload: &LeadPayload) -> ApiResult<Lead> {
        let envelope: RecordEnvelope<Lead> = self
            .http()
            .update(LEAD_RESOURCE, id.as_str(), payload)
            .await?;
        Ok(envelope.into_inner())
    }

    async fn delete_lead(&self, id: &RecordId) -> ApiResult<()> {
        let _: serde_json::Value = self.http().remove(LEAD_RESOURCE, id.as_str()).await?;
        Ok(())
    }
}
