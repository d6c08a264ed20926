#![forbid(unsafe_code)]

//! Sample data for the demo: a fixed character list for local mode and a
//! small acronym dictionary standing in for a remote lookup service.

use suggest_widgets::Candidate;

/// Characters offered by the local-mode field.
pub const CHARACTERS: &[&str] = &[
    "Jacob Portman",
    "Emma Bloom",
    "Hugh Apiston",
    "Enoch O'Connor",
    "Olive Abroholos Elephanta",
    "Millard Nullings",
    "Fiona Frauenfeld",
    "Bronwyn Bruntley",
    "Victor Bruntley",
    "Horace Somnusson",
    "Claire Densmore",
    "The Twins",
    "Abraham Portman",
    "Miss Alma LeFay Peregrine",
    "Miss Esmerelda Avocet",
    "Miss Balenciaga Wren",
    "Miss Nightjar",
    "Olivia",
    "Miss Finch",
    "The Elder Miss Finch (Aunt of the younger Miss Finch)",
    "Miss Bunting",
    "Miss Treecreeper",
    "Miss Crow",
    "Miss Jackdaw",
    "Miss Raven",
    "Miss Kestrel",
    "Miss Gannett",
    "Miss Thrush",
    "Miss Hornbill",
    "Miss Glassbill",
    "Miss Waxwing",
    "Miss Troupial",
    "Miss Grebe",
    "Miss Loon",
    "Miss Bobolink",
    "Miss Farefield",
    "Miss Goshawk",
    "Jack 'Caul' Bentham",
    "Myron Bentham",
    "The Bone Brothers",
    "Melina Manon",
    "Marcie",
    "Althea Grimmebwald",
    "Sam",
    "Radi",
    "Sergei Andropov",
    "The Peculiar Clown",
    "Snake-Charmer girl",
    "Plain looking boy",
    "Benteret",
    "Charlotte",
    "Sharon",
    "Mother Dust",
    "Reynaldo",
    "Sammy",
    "Nim",
    "Perplexus Anomalous",
    "Kim",
    "Don Fernando",
    "Carlotta",
    "Carlita",
    "Ambro dealer",
    "Sophronia Winstead",
    "G. Fünke",
    "J. Edwin Bragg",
    "Lorraine",
    "Carlos",
    "Grunt",
    "Addison MacHenry",
    "Deirdre",
    "Armageddon Chickens",
    "Miss Wren's Peculiar Pigeons",
    "Winnifred",
    "Pompey",
    "Ca'ab Magda",
    "PT",
    "Alexi",
    "Unnamed Grimbear cubs",
];

/// Short form to long forms, most frequent first.
const ACRONYMS: &[(&str, &[&str])] = &[
    ("ATP", &["adenosine triphosphate", "adenosine 5'-triphosphate"]),
    ("BMI", &["body mass index", "bone marrow involvement"]),
    ("CT", &["computed tomography", "chemotherapy", "control"]),
    ("DNA", &["deoxyribonucleic acid"]),
    ("ECG", &["electrocardiogram", "electrocardiography"]),
    ("HIV", &["human immunodeficiency virus"]),
    ("MRI", &["magnetic resonance imaging"]),
    ("PCR", &["polymerase chain reaction", "pathologic complete response"]),
    ("RNA", &["ribonucleic acid"]),
    (
        "ROS",
        &["reactive oxygen species", "rosiglitazone", "reactive oxygen"],
    ),
    ("RT", &["reverse transcription", "room temperature", "radiotherapy"]),
];

/// Character list as candidates.
pub fn characters() -> Vec<Candidate> {
    CHARACTERS.iter().copied().map(Candidate::from).collect()
}

/// Long forms of every acronym whose short form starts with `criteria`,
/// ignoring ASCII case. Duplicates keep their first position.
pub fn lookup_acronym(criteria: &str) -> Vec<Candidate> {
    let criteria = criteria.trim().to_ascii_uppercase();
    if criteria.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<Candidate> = Vec::new();
    for (short, long_forms) in ACRONYMS {
        if !short.starts_with(criteria.as_str()) {
            continue;
        }
        for long in *long_forms {
            if !out.iter().any(|c| c.title() == *long) {
                out.push(Candidate::new(*long));
            }
        }
    }
    out
}
