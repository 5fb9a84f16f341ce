//! Fixed, parameterless queries. Column order here is the contract the
//! positional schemas in `schema::tables` rely on.

/// `id, name, base_load, description`. The land use table has no load or
/// description columns, so both come back null and are defaulted downstream.
pub const LAND_USE: &str = r"
SELECT
    lu.LandUseID,
    lu.LandUse,
    NULL AS base_load,
    NULL AS description
FROM landuse lu
ORDER BY lu.LandUse
";

/// `id, name, removal_rate, description`.
pub const TREATMENT_METHOD: &str = r"
SELECT
    tm.treatment_id,
    tm.treatment_name,
    tm.default_removal_rate,
    tm.description
FROM treatment_method tm
ORDER BY tm.treatment_name
";

/// `projectid, project_name, entity_name, lead_entity_id` for active projects.
pub const PROJECT_ENTITY: &str = r"
SELECT
    h.HeaderID AS projectid,
    h.ProjectName AS project_name,
    le.LeadEntity AS entity_name,
    le.LeadEntityID AS lead_entity_id
FROM header h
JOIN leadentity le ON h.LeadEntityID = le.LeadEntityID
WHERE h.IsActive = 1
ORDER BY h.HeaderID
";

/// Each active user's latest tracked change, once per organization they
/// belong to: `lead_entity_id, changed_by, first_name, last_name, email,
/// last_activity`. Picking one contact per entity happens in `ranking`.
pub const CONTACT_ACTIVITY: &str = r"
SELECT
    uio.LeadEntityID AS lead_entity_id,
    t.ChangedBy AS changed_by,
    u.FirstName AS first_name,
    u.LastName AS last_name,
    u.EmailAddress AS email,
    t.ChangeDate AS last_activity
FROM tracking t
JOIN users u ON t.ChangedBy = u.UserName
JOIN usersinorganizations uio ON u.UserID = uio.UserID
WHERE t.IsActive = 1
  AND u.IsActive = 1
  AND t.ChangeDate = (
      SELECT MAX(ChangeDate)
      FROM tracking
      WHERE ChangedBy = t.ChangedBy
  )
";

/// Active projects with derived type, anomalies and status. Column order
/// matches `schema::PROJECT`.
pub const PROJECT: &str = r"
WITH ProjectTreatments AS (
    SELECT
        h.HeaderID,
        MAX(CASE
            WHEN nps.HeaderID IS NOT NULL AND ps.HeaderID IS NOT NULL THEN 'Hybrid'
            WHEN nps.HeaderID IS NOT NULL THEN 'Non-Point Source'
            WHEN ps.HeaderID IS NOT NULL THEN 'Point Source'
            ELSE 'Other'
        END) AS project_type,
        MAX(CASE
            WHEN (h.NonPointProject = 1 AND nps.HeaderID IS NULL) THEN 'NPS flag set but no NPS treatment found'
            WHEN (h.PointProject = 1 AND ps.HeaderID IS NULL) THEN 'PS flag set but no PS treatment found'
            WHEN (h.NonPointProject = 0 AND nps.HeaderID IS NOT NULL) THEN 'NPS treatment found but flag not set'
            WHEN (h.PointProject = 0 AND ps.HeaderID IS NOT NULL) THEN 'PS treatment found but flag not set'
            WHEN (nps.HeaderID IS NOT NULL AND ps.HeaderID IS NOT NULL
                  AND EXISTS (
                      SELECT 1 FROM npstreatment n
                      WHERE n.HeaderID = h.HeaderID
                        AND n.IsActive = 1
                        AND (n.TreatmentArea IS NULL OR n.TreatmentArea = 0)
                  )
                  AND EXISTS (
                      SELECT 1 FROM pstreatment p
                      WHERE p.HeaderID = h.HeaderID
                        AND p.IsActive = 1
                        AND (p.AverageDischarge IS NULL OR p.AverageDischarge = 0)
                  )) THEN 'Hybrid project missing both load calculation data'
            WHEN (nps.HeaderID IS NOT NULL
                  AND EXISTS (
                      SELECT 1 FROM npstreatment n
                      WHERE n.HeaderID = h.HeaderID
                        AND n.IsActive = 1
                        AND (n.TreatmentArea IS NULL OR n.TreatmentArea = 0)
                  )) THEN 'NPS treatment exists but missing calculation data'
            WHEN (ps.HeaderID IS NOT NULL
                  AND EXISTS (
                      SELECT 1 FROM pstreatment p
                      WHERE p.HeaderID = h.HeaderID
                        AND p.IsActive = 1
                        AND (p.AverageDischarge IS NULL OR p.AverageDischarge = 0)
                  )) THEN 'PS treatment exists but missing calculation data'
            ELSE NULL
        END) AS anomalies
    FROM header h
    LEFT JOIN (SELECT DISTINCT HeaderID FROM npstreatment WHERE IsActive = 1) nps
        ON h.HeaderID = nps.HeaderID
    LEFT JOIN (SELECT DISTINCT HeaderID FROM pstreatment WHERE IsActive = 1) ps
        ON h.HeaderID = ps.HeaderID
    WHERE h.IsActive = 1
    GROUP BY h.HeaderID
)
SELECT DISTINCT
    h.HeaderID AS projectid,
    h.ProjectName AS project_name,
    COALESCE(h.ProjectDescriptionText, h.ProjectDescription) AS project_description,
    le.LeadEntity AS entity_name,
    h.ProjectLatitude AS latitude,
    h.ProjectLongitude AS longitude,
    GROUP_CONCAT(DISTINCT sn.SegmentName SEPARATOR ', ') AS bay_segment,
    h.NonPointProject AS header_nps_flag,
    h.PointProject AS header_ps_flag,
    pt.project_type,
    pt.anomalies,
    CASE
        WHEN h.ProjectCompleted = 1 THEN 'Completed'
        WHEN h.ProjectOngoing = 1 THEN 'Ongoing'
        WHEN h.ProjectPlanned = 1 THEN 'Planned'
        WHEN h.ProjectDiscontinued = 1 THEN 'Discontinued'
        WHEN h.ProjectNotInitiated = 1 THEN 'Not Initiated'
        ELSE 'Unknown'
    END AS project_status,
    h.AnticipatedInitiation AS initiation_year,
    h.AnticipatedCompletion AS estimated_completion_year,
    h.DiscontinuedDate AS discontinued_year,
    h.CompletionDate AS completion_year,
    h.ActualProjectCost AS project_costs
FROM header h
LEFT JOIN leadentity le ON h.LeadEntityID = le.LeadEntityID
LEFT JOIN baysegment bs ON h.HeaderID = bs.HeaderID
LEFT JOIN segmentnames sn ON bs.SegmentID = sn.SegmentID
JOIN ProjectTreatments pt ON h.HeaderID = pt.HeaderID
WHERE h.IsActive = 1 AND (bs.IsActive = 1 OR bs.IsActive IS NULL)
GROUP BY
    h.HeaderID,
    h.ProjectName,
    h.ProjectDescriptionText,
    h.ProjectDescription,
    le.LeadEntity,
    h.ProjectLatitude,
    h.ProjectLongitude,
    h.NonPointProject,
    h.PointProject,
    pt.project_type,
    pt.anomalies,
    h.ProjectCompleted,
    h.ProjectOngoing,
    h.ProjectPlanned,
    h.ProjectDiscontinued,
    h.ProjectNotInitiated,
    h.AnticipatedInitiation,
    h.AnticipatedCompletion,
    h.DiscontinuedDate,
    h.CompletionDate,
    h.ActualProjectCost
";
